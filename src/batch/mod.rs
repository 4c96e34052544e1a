mod census;
mod lister;
mod progress;

pub use census::{append_census, parse_census, read_census, render_census};
pub use lister::{GitHubLister, PAGE_SIZE, RepositoryLister, RepositorySummary};
pub use progress::{NullSink, ProgressEvent, ProgressSink, RecordingSink};

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::analyzer::{AnalysisOutcome, Analyze};
use crate::cancel::CancelFlag;
use crate::error::RepoLocError;
use crate::scanner::ExclusionRules;

/// Largest repository analyzed unless configured otherwise, in kilobytes.
pub const DEFAULT_MAX_REPOSITORY_SIZE_KB: u64 = 150_000;

/// Why a listed repository was never analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    Fork,
    Empty,
    TooLarge { size_kb: u64, limit_kb: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fork => write!(f, "fork"),
            Self::Empty => write!(f, "empty repository"),
            Self::TooLarge { size_kb, limit_kb } => {
                write!(f, "too large ({size_kb} KB > {limit_kb} KB)")
            }
        }
    }
}

/// Skip reason for `repo`, or `None` if it should be analyzed.
#[must_use]
pub const fn skip_reason(repo: &RepositorySummary, max_size_kb: u64) -> Option<SkipReason> {
    if repo.is_fork {
        Some(SkipReason::Fork)
    } else if repo.size_kb == 0 {
        Some(SkipReason::Empty)
    } else if repo.size_kb > max_size_kb {
        Some(SkipReason::TooLarge {
            size_kb: repo.size_kb,
            limit_kb: max_size_kb,
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRepository {
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
    pub name: String,
    pub kind: String,
    pub message: String,
}

/// Username-scoped aggregate over every analyzed repository.
///
/// Partial when repositories failed or the batch was cancelled; `failures`
/// and `cancelled` say which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserReport {
    pub username: String,
    pub loc: u64,
    pub comments: u64,
    pub blanks: u64,
    pub loc_by_language: HashMap<String, u64>,
    pub analyzed: Vec<String>,
    pub skipped: Vec<SkippedRepository>,
    pub failures: Vec<RepositoryFailure>,
    pub cancelled: bool,
}

impl UserReport {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Fold one repository's outcome into the totals.
    pub fn absorb(&mut self, name: &str, outcome: &AnalysisOutcome) {
        self.loc += outcome.loc;
        self.comments += outcome.comments;
        self.blanks += outcome.blanks;
        for (ext, lines) in &outcome.loc_by_language {
            *self.loc_by_language.entry(ext.clone()).or_insert(0) += lines;
        }
        self.analyzed.push(name.to_string());
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs the analyzer over a user's repositories one at a time and merges
/// the outcomes. Per-repository failures are recorded, never propagated.
pub struct BatchAggregator<'a> {
    analyzer: &'a dyn Analyze,
    sink: &'a dyn ProgressSink,
    max_size_kb: u64,
    cancel: CancelFlag,
    directory_log: Option<PathBuf>,
}

impl<'a> BatchAggregator<'a> {
    #[must_use]
    pub fn new(analyzer: &'a dyn Analyze, sink: &'a dyn ProgressSink) -> Self {
        Self {
            analyzer,
            sink,
            max_size_kb: DEFAULT_MAX_REPOSITORY_SIZE_KB,
            cancel: CancelFlag::new(),
            directory_log: None,
        }
    }

    #[must_use]
    pub const fn with_max_size_kb(mut self, max_size_kb: u64) -> Self {
        self.max_size_kb = max_size_kb;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Append each analyzed repository's directory census to `path`.
    #[must_use]
    pub fn with_directory_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.directory_log = Some(path.into());
        self
    }

    /// Analyze every eligible repository of `owner` and merge the results.
    pub fn run(
        &self,
        owner: &str,
        repositories: &[RepositorySummary],
        rules: &ExclusionRules,
    ) -> UserReport {
        let mut report = UserReport::new(owner);
        let eligible = self.partition(repositories, &mut report);
        let total = eligible.len();
        self.sink.emit(ProgressEvent::Started { total });

        for (index, repo) in eligible.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            self.sink.emit(ProgressEvent::Progress {
                repo: repo.name.clone(),
                processed: index + 1,
                total,
            });

            match self.analyzer.analyze(owner, &repo.name, rules) {
                Ok(outcome) => {
                    if let Some(log) = &self.directory_log {
                        append_census(log, &repo.name, &outcome.directories);
                    }
                    report.absorb(&repo.name, &outcome);
                }
                Err(RepoLocError::Cancelled) => {
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    warn!(owner, repo = %repo.name, error = %e, "repository analysis failed");
                    self.sink.emit(ProgressEvent::Failed {
                        repo: repo.name.clone(),
                        message: e.to_string(),
                    });
                    report.failures.push(RepositoryFailure {
                        name: repo.name.clone(),
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if report.cancelled {
            warn!(owner, analyzed = report.analyzed.len(), "batch cancelled");
        }
        info!(
            owner,
            analyzed = report.analyzed.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            loc = report.loc,
            "batch finished"
        );
        self.sink.emit(ProgressEvent::Finished);
        report
    }

    fn partition<'r>(
        &self,
        repositories: &'r [RepositorySummary],
        report: &mut UserReport,
    ) -> Vec<&'r RepositorySummary> {
        let mut eligible = Vec::with_capacity(repositories.len());
        for repo in repositories {
            match skip_reason(repo, self.max_size_kb) {
                Some(reason) => {
                    info!(repo = %repo.name, reason = %reason, "skipping repository");
                    self.sink.emit(ProgressEvent::Skipped {
                        repo: repo.name.clone(),
                        reason: reason.to_string(),
                    });
                    report.skipped.push(SkippedRepository {
                        name: repo.name.clone(),
                        reason,
                    });
                }
                None => eligible.push(repo),
            }
        }
        eligible
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

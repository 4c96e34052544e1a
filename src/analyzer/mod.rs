mod stage;

pub use stage::AnalysisStage;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::branch::BranchResolver;
use crate::cancel::CancelFlag;
use crate::counter::{RepositoryCount, TreeCounter};
use crate::error::{RepoLocError, Result};
use crate::scanner::ExclusionRules;
use crate::snapshot::{SnapshotFetcher, Workspace};

use stage::StageTracker;

/// Result of analyzing one repository. Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisOutcome {
    pub loc: u64,
    pub comments: u64,
    pub blanks: u64,
    pub loc_by_language: HashMap<String, u64>,
    pub files: u64,
    #[serde(skip)]
    pub directories: HashMap<String, usize>,
}

impl From<RepositoryCount> for AnalysisOutcome {
    fn from(count: RepositoryCount) -> Self {
        Self {
            loc: count.total_code,
            comments: count.total_comments,
            blanks: count.total_blanks,
            loc_by_language: count.by_extension,
            files: count.files,
            directories: count.directories,
        }
    }
}

/// Analysis of a single repository, the seam the batch drives.
pub trait Analyze: Send + Sync {
    /// Analyze `owner/repo` under the given exclusion rules.
    ///
    /// # Errors
    /// Returns an error if the branch lookup, download or extraction fails.
    fn analyze(&self, owner: &str, repo: &str, rules: &ExclusionRules) -> Result<AnalysisOutcome>;
}

/// Resolve branch, fetch snapshot, count, and always clean up.
///
/// Each call creates and destroys exactly one [`Workspace`] and makes one
/// branch-resolution and at most one download attempt. Retries are the
/// caller's business.
pub struct RepositoryAnalyzer {
    resolver: BranchResolver,
    fetcher: SnapshotFetcher,
    counter: TreeCounter,
    workspace_base: Option<PathBuf>,
    cancel: CancelFlag,
}

impl std::fmt::Debug for RepositoryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryAnalyzer")
            .field("workspace_base", &self.workspace_base)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl RepositoryAnalyzer {
    #[must_use]
    pub fn new(resolver: BranchResolver, fetcher: SnapshotFetcher, counter: TreeCounter) -> Self {
        Self {
            resolver,
            fetcher,
            counter,
            workspace_base: None,
            cancel: CancelFlag::new(),
        }
    }

    /// Create workspaces below `base` instead of the system temp directory.
    #[must_use]
    pub fn with_workspace_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.workspace_base = Some(base.into());
        self
    }

    /// Share `cancel` with this analyzer and its counter.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.counter = self.counter.with_cancel(cancel.clone());
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn resolver(&self) -> &BranchResolver {
        &self.resolver
    }

    fn create_workspace(&self) -> Result<Workspace> {
        self.workspace_base
            .as_deref()
            .map_or_else(Workspace::create, |base| Workspace::create_in(base))
    }

    fn ensure_not_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(RepoLocError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn run_stages(
        &self,
        tracker: &mut StageTracker,
        owner: &str,
        repo: &str,
        rules: &ExclusionRules,
        workspace: &Workspace,
    ) -> Result<AnalysisOutcome> {
        self.ensure_not_cancelled()?;
        let branch = self.resolver.resolve_default_branch(owner, repo)?;
        tracker.advance(AnalysisStage::BranchResolved);

        self.ensure_not_cancelled()?;
        let root = self
            .fetcher
            .fetch_and_extract(owner, repo, &branch, workspace)?;
        tracker.advance(AnalysisStage::Fetched);

        let count = self.counter.count_tree(&root, rules)?;
        tracker.advance(AnalysisStage::Counted);
        Ok(count.into())
    }
}

impl Analyze for RepositoryAnalyzer {
    fn analyze(&self, owner: &str, repo: &str, rules: &ExclusionRules) -> Result<AnalysisOutcome> {
        let mut tracker = StageTracker::new(owner, repo);
        let workspace = self.create_workspace()?;
        let workspace_path = workspace.path().to_path_buf();

        let result = self.run_stages(&mut tracker, owner, repo, rules, &workspace);

        if let Err(e) = workspace.destroy() {
            warn!(owner, repo, error = %e, "workspace cleanup failed");
        }
        log_cleanup(&workspace_path);

        match result {
            Ok(outcome) => {
                tracker.advance(AnalysisStage::CleanedUp);
                info!(
                    owner,
                    repo,
                    loc = outcome.loc,
                    comments = outcome.comments,
                    blanks = outcome.blanks,
                    "analysis complete"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }
}

fn log_cleanup(path: &Path) {
    if path.exists() {
        warn!(path = %path.display(), "workspace still present after cleanup");
    } else {
        info!(path = %path.display(), "cleaned up temporary directory");
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

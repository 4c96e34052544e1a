use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::error::{RepoLocError, Result};
use crate::scanner::{DirectoryScanner, ExclusionRules, FileScanner, WorkItem};

use super::comment::CommentPolicy;
use super::sloc::{FileClassification, SlocCounter};

/// Aggregate line counts of one extracted repository.
///
/// `by_extension` sums code lines only, so its values always add up to
/// `total_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryCount {
    pub total_code: u64,
    pub total_comments: u64,
    pub total_blanks: u64,
    pub by_extension: HashMap<String, u64>,
    /// Number of files that were classified.
    pub files: u64,
    /// Retained directory names and how often each occurred.
    pub directories: HashMap<String, usize>,
}

impl RepositoryCount {
    fn absorb(mut self, file: FileClassification) -> Self {
        self.total_code += file.code;
        self.total_comments += file.comment;
        self.total_blanks += file.blank;
        self.files += 1;
        *self.by_extension.entry(file.extension).or_default() += file.code;
        self
    }

    /// Combine two partial counts. Associative and commutative.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.total_code += other.total_code;
        self.total_comments += other.total_comments;
        self.total_blanks += other.total_blanks;
        self.files += other.files;
        for (extension, code) in other.by_extension {
            *self.by_extension.entry(extension).or_default() += code;
        }
        for (name, seen) in other.directories {
            *self.directories.entry(name).or_default() += seen;
        }
        self
    }
}

/// Walks an extraction root and classifies every retained file on a bounded
/// rayon pool.
pub struct TreeCounter {
    counter: SlocCounter,
    pool: Option<Arc<ThreadPool>>,
    cancel: CancelFlag,
}

impl TreeCounter {
    /// Counter running on rayon's global pool, sized to available parallelism.
    #[must_use]
    pub fn new(policy: CommentPolicy) -> Self {
        Self {
            counter: SlocCounter::new(policy),
            pool: None,
            cancel: CancelFlag::new(),
        }
    }

    /// Use a dedicated pool of `workers` threads instead of the global pool.
    ///
    /// # Errors
    /// Returns an error if `workers` is zero or the pool cannot be built.
    pub fn with_workers(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(RepoLocError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("repo-loc-count-{i}"))
            .build()
            .map_err(|e| RepoLocError::Config(format!("Failed to build worker pool: {e}")))?;
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Count every retained file below `root`.
    ///
    /// Unreadable files are logged and contribute zero lines.
    ///
    /// # Errors
    /// Returns [`RepoLocError::Cancelled`] if the cancel flag was raised while counting.
    pub fn count_tree(&self, root: &Path, rules: &ExclusionRules) -> Result<RepositoryCount> {
        let scan = DirectoryScanner::new(rules).scan(root);

        if scan.files.is_empty() {
            debug!(root = %root.display(), "no files to process");
            return Ok(RepositoryCount {
                directories: scan.directories,
                ..RepositoryCount::default()
            });
        }

        debug!(files = scan.files.len(), "starting to process files");
        let counted = match &self.pool {
            Some(pool) => pool.install(|| self.count_files(&scan.files)),
            None => self.count_files(&scan.files),
        };

        if self.cancel.is_cancelled() {
            return Err(RepoLocError::Cancelled);
        }

        debug!(
            loc = counted.total_code,
            comments = counted.total_comments,
            blanks = counted.total_blanks,
            "finished processing files"
        );
        Ok(RepositoryCount {
            directories: scan.directories,
            ..counted
        })
    }

    fn count_files(&self, files: &[WorkItem]) -> RepositoryCount {
        files
            .par_iter()
            .map(|item| self.classify(item))
            .fold(RepositoryCount::default, RepositoryCount::absorb)
            .reduce(RepositoryCount::default, RepositoryCount::merge)
    }

    fn classify(&self, item: &WorkItem) -> FileClassification {
        if self.cancel.is_cancelled() {
            return FileClassification::empty(item.extension.clone());
        }
        match self.counter.count_file(&item.path, &item.extension) {
            Ok(result) => result,
            Err(e) => {
                warn!(path = %item.path.display(), error = %e, "error processing file");
                FileClassification::empty(item.extension.clone())
            }
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

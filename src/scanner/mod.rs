mod filter;
mod types;

pub use filter::{
    DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_EXTENSIONS, ExclusionRules, compound_extension_of,
    extension_of,
};
pub use types::{ScanResult, WorkItem};

use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Trait for walking an extracted tree and selecting the files to count.
pub trait FileScanner {
    /// Walk `root`, pruning excluded directories before descent and dropping
    /// excluded extensions before any read.
    fn scan(&self, root: &Path) -> ScanResult;
}

pub struct DirectoryScanner<'a> {
    rules: &'a ExclusionRules,
}

impl<'a> DirectoryScanner<'a> {
    #[must_use]
    pub const fn new(rules: &'a ExclusionRules) -> Self {
        Self { rules }
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .rules
                .is_excluded_dir(&entry.file_name().to_string_lossy())
    }
}

impl FileScanner for DirectoryScanner<'_> {
    fn scan(&self, root: &Path) -> ScanResult {
        let mut result = ScanResult::default();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let file_type = entry.file_type();
            let name = entry.file_name().to_string_lossy();

            if file_type.is_dir() {
                if entry.depth() > 0 {
                    *result.directories.entry(name.into_owned()).or_default() += 1;
                }
            } else if file_type.is_file() {
                if self.rules.is_excluded_file(&name) {
                    continue;
                }
                result.files.push(WorkItem {
                    extension: extension_of(&name).to_string(),
                    path: entry.into_path(),
                });
            }
        }

        debug!(
            root = %root.display(),
            files = result.files.len(),
            directories = result.directories.len(),
            "scan complete"
        );
        result
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

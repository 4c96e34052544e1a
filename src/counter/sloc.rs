use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{RepoLocError, Result};

use super::comment::{CommentPolicy, LineKind};

/// Line counts of one retained file. Never mutated once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileClassification {
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub extension: String,
}

impl FileClassification {
    /// All-zero result, used for files that could not be read.
    #[must_use]
    pub const fn empty(extension: String) -> Self {
        Self {
            code: 0,
            comment: 0,
            blank: 0,
            extension,
        }
    }
}

pub struct SlocCounter {
    policy: CommentPolicy,
}

impl SlocCounter {
    #[must_use]
    pub const fn new(policy: CommentPolicy) -> Self {
        Self { policy }
    }

    /// Count lines from a buffered reader.
    ///
    /// Lines are split on `\n` and decoded lossily, so invalid UTF-8 never
    /// aborts the count; undecodable bytes become replacement characters.
    ///
    /// # Errors
    /// Returns an I/O error if reading from the reader fails.
    pub fn count_reader<R: BufRead>(
        &self,
        mut reader: R,
        extension: &str,
    ) -> std::io::Result<FileClassification> {
        let mut result = FileClassification::empty(extension.to_string());
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            match self.policy.classify(&line, extension) {
                LineKind::Code => result.code += 1,
                LineKind::Comment => result.comment += 1,
                LineKind::Blank => result.blank += 1,
            }
        }

        Ok(result)
    }

    /// Open and count a single file.
    ///
    /// # Errors
    /// Returns [`RepoLocError::FileRead`] if the file cannot be opened or read.
    pub fn count_file(&self, path: &Path, extension: &str) -> Result<FileClassification> {
        let to_error = |source| RepoLocError::FileRead {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        self.count_reader(BufReader::new(file), extension)
            .map_err(to_error)
    }
}

#[cfg(test)]
#[path = "sloc_tests.rs"]
mod tests;

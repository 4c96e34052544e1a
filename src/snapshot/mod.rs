mod workspace;

pub use workspace::Workspace;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use zip::ZipArchive;

use crate::error::{HttpError, RepoLocError, Result};
use crate::http::{HttpClient, endpoint};

pub const DEFAULT_ARCHIVE_BASE: &str = "https://github.com";

/// Downloads a branch archive and unpacks it into a workspace.
pub struct SnapshotFetcher {
    client: Arc<dyn HttpClient>,
    archive_base: String,
}

impl SnapshotFetcher {
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_archive_base(mut self, archive_base: impl Into<String>) -> Self {
        self.archive_base = archive_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Provider URL of the zip archive of `branch`.
    ///
    /// Slashes in the branch name stay path separators; every other
    /// reserved character is percent-encoded.
    ///
    /// # Errors
    /// Returns an error if the archive base is not a usable URL.
    pub fn archive_url(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> std::result::Result<String, HttpError> {
        let (parent, leaf) = branch.rsplit_once('/').unwrap_or(("", branch));
        let file = format!("{leaf}.zip");
        let url = endpoint(
            &self.archive_base,
            [owner, repo, "archive", "refs", "heads"]
                .into_iter()
                .chain(parent.split('/').filter(|s| !s.is_empty()))
                .chain(std::iter::once(file.as_str())),
        )?;
        Ok(url.into())
    }

    /// Download the archive of `owner/repo@branch` and extract it into `workspace`.
    ///
    /// Returns the extraction root: the `{repo}-{branch}` directory the
    /// provider wraps archives in, or the workspace itself when the archive
    /// does not follow that layout.
    ///
    /// # Errors
    /// Returns [`RepoLocError::SnapshotDownload`] on transport failure or a
    /// non-success status, and [`RepoLocError::Extraction`] if the body is
    /// not a readable zip archive.
    pub fn fetch_and_extract(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        workspace: &Workspace,
    ) -> Result<PathBuf> {
        let download_error = |status: Option<u16>, reason: String| RepoLocError::SnapshotDownload {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            status,
            reason,
        };

        let url = self
            .archive_url(owner, repo, branch)
            .map_err(|e| download_error(None, e.to_string()))?;
        info!(owner, repo, url = %url, "downloading repository");

        let response = self
            .client
            .get(&url)
            .map_err(|e| download_error(None, e.to_string()))?;
        if !response.is_success() {
            warn!(owner, repo, status = response.status, "failed to download repository");
            return Err(download_error(
                Some(response.status),
                format!("HTTP {}", response.status),
            ));
        }

        extract_archive(&response.body, repo, workspace.path())?;
        let root = resolve_extraction_root(workspace.path(), repo, branch);
        info!(root = %root.display(), "extracted repository");
        Ok(root)
    }
}

/// Unpack zip `bytes` below `dest`. An entry whose path would escape `dest`
/// fails the whole extraction.
///
/// # Errors
/// Returns [`RepoLocError::Extraction`] if the archive is corrupt or cannot be written.
pub fn extract_archive(bytes: &[u8], repo: &str, dest: &Path) -> Result<()> {
    let extraction_error = |e: zip::result::ZipError| RepoLocError::Extraction {
        repo: repo.to_string(),
        reason: e.to_string(),
    };
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(extraction_error)?;
    archive.extract(dest).map_err(extraction_error)
}

/// Name of the single top-level directory in a provider branch archive.
///
/// Slashes in branch names become dashes (`feature/x` → `repo-feature-x`).
#[must_use]
pub fn expected_root_name(repo: &str, branch: &str) -> String {
    format!("{repo}-{}", branch.replace('/', "-"))
}

fn resolve_extraction_root(workspace: &Path, repo: &str, branch: &str) -> PathBuf {
    let expected = workspace.join(expected_root_name(repo, branch));
    if expected.is_dir() {
        expected
    } else {
        warn!(
            expected = %expected.display(),
            "archive root not found, counting from workspace root"
        );
        workspace.to_path_buf()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{RepoLocError, Result};

const WORKSPACE_PREFIX: &str = "repo-loc-";

/// Exclusively owned scratch directory for one repository analysis.
///
/// Destroyed exactly once: explicitly through [`Workspace::destroy`] or, on
/// any other exit path, when dropped. Write permission is restored on every
/// entry before removal so read-only archive contents cannot block cleanup.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    /// Create a uniquely named workspace in the system temp directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a uniquely named workspace below `base`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn create_in(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(base)
            .map_err(|source| RepoLocError::Workspace {
                path: base.to_path_buf(),
                source,
            })?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "created workspace");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace now and report the outcome.
    ///
    /// # Errors
    /// Returns an error if the tree could not be removed.
    pub fn destroy(mut self) -> Result<()> {
        self.release().map_err(|source| RepoLocError::Workspace {
            path: self.path.clone(),
            source,
        })
    }

    fn release(&mut self) -> io::Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        restore_write_permission(dir.path());
        let result = dir.close();
        debug!(path = %self.path.display(), ok = result.is_ok(), "cleaned up workspace");
        result
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(path = %self.path.display(), error = %e, "failed to remove workspace");
        }
    }
}

/// Grant the owner full access on `path` and, for directories, everything
/// below it. Permissions are fixed before each directory is listed.
fn restore_write_permission(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };
    if metadata.file_type().is_symlink() {
        return;
    }

    let mut permissions = metadata.permissions();
    if !is_writable(&permissions) {
        make_writable(&mut permissions);
        let _ = fs::set_permissions(path, permissions);
    }

    if metadata.is_dir()
        && let Ok(entries) = fs::read_dir(path)
    {
        for entry in entries.flatten() {
            restore_write_permission(&entry.path());
        }
    }
}

#[cfg(unix)]
fn is_writable(permissions: &fs::Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    permissions.mode() & 0o700 == 0o700
}

#[cfg(unix)]
fn make_writable(permissions: &mut fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(permissions.mode() | 0o700);
}

#[cfg(not(unix))]
fn is_writable(permissions: &fs::Permissions) -> bool {
    !permissions.readonly()
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(permissions: &mut fs::Permissions) {
    permissions.set_readonly(false);
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const CACHE_SUBDIR: &str = "branches";

/// Resolved default branch and the instant after which it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCacheEntry {
    pub branch: String,
    pub expires_at: DateTime<Utc>,
}

impl BranchCacheEntry {
    /// Expiry saturates at the latest representable instant.
    #[must_use]
    pub fn new(branch: impl Into<String>, ttl: TimeDelta) -> Self {
        Self {
            branch: branch.into(),
            expires_at: Utc::now()
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Stale once `now` is strictly past the expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Default-branch cache keyed by `(owner, repo)`.
///
/// Safe for concurrent use; concurrent writers follow last-writer-wins.
/// Entries are never evicted, only superseded. When a directory is
/// configured, entries are mirrored to one JSON file per key and disk
/// failures are logged and ignored.
#[derive(Debug, Default)]
pub struct BranchCache {
    entries: DashMap<(String, String), BranchCacheEntry>,
    dir: Option<PathBuf>,
}

impl BranchCache {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        Self {
            entries: DashMap::new(),
            dir: Some(dir.into()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Fresh branch name for `owner/repo`, consulting disk on a memory miss.
    #[must_use]
    pub fn get(&self, owner: &str, repo: &str) -> Option<String> {
        let now = Utc::now();
        let key = (owner.to_string(), repo.to_string());

        if let Some(entry) = self.entries.get(&key)
            && !entry.is_expired_at(now)
        {
            return Some(entry.branch.clone());
        }

        let entry = self.read_from_disk(owner, repo)?;
        if entry.is_expired_at(now) {
            return None;
        }
        let branch = entry.branch.clone();
        self.entries.insert(key, entry);
        Some(branch)
    }

    /// Store an entry, superseding any previous one.
    pub fn insert(&self, owner: &str, repo: &str, entry: BranchCacheEntry) {
        if self.write_to_disk(owner, repo, &entry).is_none() {
            warn!(owner, repo, "failed to persist branch cache entry");
        }
        self.entries
            .insert((owner.to_string(), repo.to_string()), entry);
    }

    /// Drop every entry from memory and disk.
    ///
    /// Returns the number of cache files deleted.
    pub fn clear(&self) -> usize {
        self.entries.clear();
        self.dir.as_deref().map_or(0, clear_dir)
    }

    fn read_from_disk(&self, owner: &str, repo: &str) -> Option<BranchCacheEntry> {
        let path = cache_file_path(self.dir.as_deref()?, owner, repo);
        let content = fs::read(&path).ok()?;
        match serde_json::from_slice(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring corrupt cache file");
                None
            }
        }
    }

    fn write_to_disk(&self, owner: &str, repo: &str, entry: &BranchCacheEntry) -> Option<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Some(());
        };
        let target = cache_file_path(dir, owner, repo);
        let parent = target.parent()?;
        fs::create_dir_all(parent).ok()?;

        let content = serde_json::to_vec(entry).ok()?;
        let mut staged = tempfile::NamedTempFile::new_in(parent).ok()?;
        staged.write_all(&content).ok()?;
        staged.persist(&target).ok()?;
        Some(())
    }
}

/// Compute SHA-256 hash of the cache key for the file name.
pub(crate) fn hash_key(owner: &str, repo: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner.as_bytes());
    hasher.update(b"/");
    hasher.update(repo.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub(crate) fn cache_file_path(dir: &Path, owner: &str, repo: &str) -> PathBuf {
    dir.join(CACHE_SUBDIR)
        .join(format!("{}.json", hash_key(owner, repo)))
}

fn clear_dir(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir.join(CACHE_SUBDIR)) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| fs::remove_file(path).is_ok())
        .count()
}

/// Platform cache directory for persisted branch records.
#[must_use]
pub fn default_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", crate::config::APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

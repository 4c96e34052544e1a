mod cache;

pub use cache::{BranchCache, BranchCacheEntry, default_cache_dir};

use std::sync::Arc;

use chrono::TimeDelta;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{RepoLocError, Result};
use crate::http::{HttpClient, endpoint};

/// Branch assumed when the metadata response omits `default_branch`.
pub const FALLBACK_BRANCH: &str = "master";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;
/// Upper bound for a cache TTL: ten years.
pub const MAX_CACHE_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Deserialize)]
struct RepositoryMetadata {
    #[serde(default)]
    default_branch: Option<String>,
}

/// Resolves a repository's default branch through the provider's metadata
/// API, consulting a shared cache first.
pub struct BranchResolver {
    client: Arc<dyn HttpClient>,
    cache: Arc<BranchCache>,
    api_base: String,
    ttl: TimeDelta,
}

impl BranchResolver {
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, cache: Arc<BranchCache>) -> Self {
        Self {
            client,
            cache,
            api_base: DEFAULT_API_BASE.to_string(),
            ttl: TimeDelta::hours(DEFAULT_CACHE_TTL_HOURS),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &BranchCache {
        &self.cache
    }

    /// Resolve the default branch of `owner/repo`.
    ///
    /// A fresh cache entry short-circuits the network request. Otherwise one
    /// metadata request is issued and its answer cached for the TTL.
    ///
    /// # Errors
    /// Returns [`RepoLocError::RepositoryMetadata`] on transport failure,
    /// non-success status or an unparseable response body.
    pub fn resolve_default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        if let Some(branch) = self.cache.get(owner, repo) {
            debug!(owner, repo, branch = %branch, "default branch cache hit");
            return Ok(branch);
        }

        let metadata_error = |status: Option<u16>, reason: String| {
            RepoLocError::RepositoryMetadata {
                owner: owner.to_string(),
                repo: repo.to_string(),
                status,
                reason,
            }
        };

        let url = endpoint(&self.api_base, ["repos", owner, repo])
            .map_err(|e| metadata_error(None, e.to_string()))?;
        let response = self
            .client
            .get(url.as_str())
            .map_err(|e| metadata_error(None, e.to_string()))?;

        if !response.is_success() {
            warn!(owner, repo, status = response.status, "failed to get repository info");
            return Err(metadata_error(
                Some(response.status),
                format!("HTTP {}", response.status),
            ));
        }

        let metadata: RepositoryMetadata = serde_json::from_slice(&response.body)
            .map_err(|e| metadata_error(Some(response.status), format!("invalid response: {e}")))?;
        let branch = metadata
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string());

        info!(owner, repo, branch = %branch, "resolved default branch");
        self.cache
            .insert(owner, repo, BranchCacheEntry::new(branch.clone(), self.ttl));
        Ok(branch)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

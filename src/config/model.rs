use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_MAX_REPOSITORY_SIZE_KB;
use crate::branch::{DEFAULT_API_BASE, DEFAULT_CACHE_TTL_HOURS, MAX_CACHE_TTL_HOURS};
use crate::counter::CommentPolicy;
use crate::error::{RepoLocError, Result};
use crate::http::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::scanner::ExclusionRules;
use crate::snapshot::DEFAULT_ARCHIVE_BASE;

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Root of `.repo-loc.toml`. Every section is optional; unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Deny-lists applied to every analysis [exclude].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
    /// Start from the built-in deny-lists (default: true).
    #[serde(default = "default_true")]
    pub use_defaults: bool,

    /// Extra directory names, added to the defaults.
    #[serde(default)]
    pub dirs: Vec<String>,

    /// Extra extensions with leading dot, added to the defaults.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            dirs: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

/// Hosting provider endpoints [provider].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_archive_base")]
    pub archive_base: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            archive_base: default_archive_base(),
            token_env: default_token_env(),
        }
    }
}

impl ProviderConfig {
    /// Token read from `token_env`, if set and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Batch and request limits [limits].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_max_repository_size_kb")]
    pub max_repository_size_kb: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Counting threads; the global pool when unset.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_repository_size_kb: default_max_repository_size_kb(),
            request_timeout_secs: default_request_timeout_secs(),
            workers: None,
        }
    }
}

/// Default-branch cache [cache].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Persist resolved branches to disk (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Cache directory; the platform cache directory when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: default_ttl_hours(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub policy: CommentPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Append a per-repository directory census here.
    #[serde(default)]
    pub directory_log: Option<PathBuf>,
}

impl Config {
    /// Exclusion rules described by the [exclude] section.
    #[must_use]
    pub fn exclusion_rules(&self) -> ExclusionRules {
        let base = if self.exclude.use_defaults {
            ExclusionRules::defaults()
        } else {
            ExclusionRules::default()
        };
        base.extended(
            self.exclude.dirs.iter().cloned(),
            self.exclude.extensions.iter().cloned(),
        )
    }

    /// Reject values that parse but cannot be used.
    ///
    /// # Errors
    /// Returns [`RepoLocError::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.limits.workers == Some(0) {
            return Err(RepoLocError::Config(
                "limits.workers must be at least 1".to_string(),
            ));
        }
        if self.limits.request_timeout_secs == 0 {
            return Err(RepoLocError::Config(
                "limits.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.cache.ttl_hours <= 0 {
            return Err(RepoLocError::Config(
                "cache.ttl_hours must be positive".to_string(),
            ));
        }
        if self.cache.ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(RepoLocError::Config(format!(
                "cache.ttl_hours must be at most {MAX_CACHE_TTL_HOURS}"
            )));
        }
        if let Some(ext) = self.exclude.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(RepoLocError::Config(format!(
                "exclude.extensions entry '{ext}' must start with '.'"
            )));
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_archive_base() -> String {
    DEFAULT_ARCHIVE_BASE.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

const fn default_max_repository_size_kb() -> u64 {
    DEFAULT_MAX_REPOSITORY_SIZE_KB
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_ttl_hours() -> i64 {
    DEFAULT_CACHE_TTL_HOURS
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::{debug, warn};

use crate::analyzer::RepositoryAnalyzer;
use crate::branch::{BranchCache, BranchResolver, default_cache_dir};
use crate::cancel::CancelFlag;
use crate::cli::RunArgs;
use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::counter::TreeCounter;
use crate::error::{RepoLocError, Result};
use crate::http::{HttpClient, ReqwestClient};
use crate::snapshot::SnapshotFetcher;

/// Load configuration from `path`, the discovered file, or defaults.
///
/// # Errors
/// Returns an error if the config file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }
    let loader = FileConfigLoader::new();
    match path {
        Some(p) => loader.load_from_path(p),
        None => loader.load(),
    }
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_run_overrides(config: &mut Config, args: &RunArgs) {
    if args.no_default_excludes {
        config.exclude.use_defaults = false;
    }
    config.exclude.dirs.extend(args.ignore_dirs.iter().cloned());
    config.exclude.extensions.extend(args.ignore_exts.iter().cloned());
    if let Some(max) = args.max_size_kb {
        config.limits.max_repository_size_kb = max;
    }
    if args.workers.is_some() {
        config.limits.workers = args.workers;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }
}

/// Production HTTP client configured from [provider] and [limits].
///
/// # Errors
/// Returns an error if the client cannot be constructed.
pub fn http_client(config: &Config) -> Result<Arc<dyn HttpClient>> {
    let token = config.provider.token();
    if token.is_none() {
        debug!(var = %config.provider.token_env, "no API token set, requests are unauthenticated");
    }
    let client = ReqwestClient::new(
        Duration::from_secs(config.limits.request_timeout_secs),
        token,
    )?;
    Ok(Arc::new(client))
}

/// Branch cache described by [cache]: persistent when enabled and a
/// directory is available, in-memory otherwise.
#[must_use]
pub fn branch_cache(config: &Config) -> BranchCache {
    if !config.cache.enabled {
        return BranchCache::in_memory();
    }
    match config.cache.dir.clone().or_else(default_cache_dir) {
        Some(dir) => BranchCache::persistent(dir),
        None => {
            warn!("no cache directory available, branch cache is in-memory only");
            BranchCache::in_memory()
        }
    }
}

fn cache_ttl(config: &Config) -> Result<TimeDelta> {
    TimeDelta::try_hours(config.cache.ttl_hours).ok_or_else(|| {
        RepoLocError::Config(format!(
            "cache.ttl_hours {} is out of range",
            config.cache.ttl_hours
        ))
    })
}

/// Assemble the analysis pipeline from configuration.
///
/// # Errors
/// Returns an error if the cache TTL is out of range or a dedicated worker
/// pool cannot be built.
pub fn build_analyzer(
    config: &Config,
    client: Arc<dyn HttpClient>,
    cancel: CancelFlag,
) -> Result<RepositoryAnalyzer> {
    let resolver = BranchResolver::new(client.clone(), Arc::new(branch_cache(config)))
        .with_api_base(config.provider.api_base.clone())
        .with_ttl(cache_ttl(config)?);
    let fetcher =
        SnapshotFetcher::new(client).with_archive_base(config.provider.archive_base.clone());

    let mut counter = TreeCounter::new(config.classifier.policy);
    if let Some(workers) = config.limits.workers {
        counter = counter.with_workers(workers)?;
    }

    Ok(RepositoryAnalyzer::new(resolver, fetcher, counter).with_cancel(cancel))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

use std::path::Path;

use crate::cli::{CacheAction, CacheArgs, Cli};
use crate::config::Config;
use crate::{EXIT_ERROR, EXIT_SUCCESS, RepoLocError, Result};

use super::context::{branch_cache, load_config};

#[must_use]
pub fn run_cache(args: &CacheArgs, cli: &Cli) -> i32 {
    let result = match &args.action {
        CacheAction::Clear { config } => run_cache_clear_impl(config.as_deref(), cli.no_config),
    };
    match result {
        Ok(removed) => {
            println!("Removed {removed} cached branch record(s)");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}

fn run_cache_clear_impl(config_path: Option<&Path>, no_config: bool) -> Result<usize> {
    let config = load_config(config_path, no_config)?;
    clear_cache(&config)
}

/// Remove every persisted branch record for the configured cache.
///
/// # Errors
/// Returns an error if no cache directory can be determined.
pub fn clear_cache(config: &Config) -> Result<usize> {
    let mut config = config.clone();
    config.cache.enabled = true;
    let cache = branch_cache(&config);
    if cache.dir().is_none() {
        return Err(RepoLocError::Config(
            "no cache directory available".to_string(),
        ));
    }
    Ok(cache.clear())
}

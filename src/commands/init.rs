use std::fs;

use crate::cli::InitArgs;
use crate::{EXIT_ERROR, EXIT_SUCCESS, RepoLocError, Result};

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}

/// Write a commented default configuration file.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(RepoLocError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub const fn generate_config_template() -> &'static str {
    r##"# repo-loc configuration file

[exclude]
# Start from the built-in deny-lists (see `repo-loc defaults`)
use_defaults = true

# Extra directory names to skip, matched against the final path segment
# dirs = ["third_party", "generated"]

# Extra extensions to skip, with leading dot; ".pb.go" matches "api.pb.go"
# extensions = [".pb.go", ".snap"]

[provider]
# api_base = "https://api.github.com"
# archive_base = "https://github.com"

# Environment variable holding the API token
token_env = "GITHUB_TOKEN"

[limits]
# Repositories larger than this are skipped (kilobytes)
max_repository_size_kb = 150000

# Timeout for each HTTP request (seconds)
request_timeout_secs = 30

# Counting threads (default: one per CPU)
# workers = 4

[cache]
# Persist resolved default branches between runs
enabled = true
ttl_hours = 24
# dir = "/var/cache/repo-loc"

[classifier]
# "generic": "#", "//", "/*", "*" and "*/" start a comment in every file
# "per-language": comment prefixes chosen by extension family
policy = "generic"

[report]
# Append the directory names seen in each repository to this file
# directory_log = "common_directories.log"
"##
}

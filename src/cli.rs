use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "repo-loc")]
#[command(author, version, about = "Count lines of code across a user's remote repositories")]
#[command(long_about = "Downloads a snapshot of each repository, counts code, comment and \
    blank lines per file extension, and aggregates the totals.\n\n\
    Exit codes:\n  \
    0 - All repositories analyzed\n  \
    1 - Completed, but some repositories failed\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze every eligible repository of a user
    User(UserArgs),

    /// Analyze a single repository
    Repo(RepoArgs),

    /// Print the built-in exclusion lists
    Defaults,

    /// Generate a default configuration file
    Init(InitArgs),

    /// Branch cache maintenance
    Cache(CacheArgs),

    /// Aggregate a directory log into per-directory totals as JSON
    Census(CensusArgs),
}

/// Options shared by every command that runs an analysis.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Additional directory name to skip (repeatable)
    #[arg(long = "ignore-dir", value_name = "NAME")]
    pub ignore_dirs: Vec<String>,

    /// Additional file extension to skip, with leading dot (repeatable)
    #[arg(long = "ignore-ext", value_name = "EXT")]
    pub ignore_exts: Vec<String>,

    /// Do not start from the built-in exclusion lists
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Skip repositories larger than this many kilobytes
    #[arg(long, value_name = "KB")]
    pub max_size_kb: Option<u64>,

    /// Number of counting threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// Do not read or write the persistent branch cache
    #[arg(long)]
    pub no_cache: bool,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UserArgs {
    /// Account whose repositories are analyzed
    pub username: String,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository as OWNER/REPO
    pub target: RepoSlug,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = ".repo-loc.toml")]
    pub output: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove every persisted default-branch record
    Clear {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct CensusArgs {
    /// Directory log written by `report.directory_log`
    pub log: PathBuf,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// `owner/repo` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(format!("expected OWNER/REPO, got '{s}'")),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

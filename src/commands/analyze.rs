use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::analyzer::Analyze;
use crate::batch::{
    BatchAggregator, GitHubLister, ProgressSink, RepositoryFailure, RepositoryLister, UserReport,
    append_census,
};
use crate::cancel::CancelFlag;
use crate::cli::{Cli, RepoArgs, RunArgs, UserArgs};
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::RepositoryProgress;
use crate::{EXIT_ERROR, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};

use super::context::{apply_run_overrides, build_analyzer, http_client, load_config};

#[must_use]
pub fn run_user(args: &UserArgs, cli: &Cli) -> i32 {
    report_exit_code(run_user_impl(args, cli))
}

#[must_use]
pub fn run_repo(args: &RepoArgs, cli: &Cli) -> i32 {
    report_exit_code(run_repo_impl(args, cli))
}

fn report_exit_code(result: Result<UserReport>) -> i32 {
    match result {
        Ok(report) if report.has_failures() => EXIT_PARTIAL_FAILURE,
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}

fn prepare_config(run: &RunArgs, cli: &Cli) -> Result<Config> {
    let mut config = load_config(run.config.as_deref(), cli.no_config)?;
    apply_run_overrides(&mut config, run);
    config.validate()?;
    Ok(config)
}

fn run_user_impl(args: &UserArgs, cli: &Cli) -> Result<UserReport> {
    let config = prepare_config(&args.run, cli)?;
    let client = http_client(&config)?;
    let progress = RepositoryProgress::new(cli.quiet);

    let report = analyze_user(&config, &args.username, client, &progress, CancelFlag::new())?;
    emit_report(&report, &args.run)?;
    Ok(report)
}

fn run_repo_impl(args: &RepoArgs, cli: &Cli) -> Result<UserReport> {
    let config = prepare_config(&args.run, cli)?;
    let client = http_client(&config)?;

    let report = analyze_repository(&config, &args.target.owner, &args.target.repo, client)?;
    emit_report(&report, &args.run)?;
    Ok(report)
}

/// List `username`'s repositories and analyze every eligible one.
///
/// # Errors
/// Returns an error if the configuration is unusable or the listing fails.
/// Per-repository failures are recorded in the report instead.
pub fn analyze_user(
    config: &Config,
    username: &str,
    client: Arc<dyn HttpClient>,
    sink: &dyn ProgressSink,
    cancel: CancelFlag,
) -> Result<UserReport> {
    let lister = GitHubLister::new(client.clone()).with_api_base(config.provider.api_base.clone());
    let repositories = lister.list_repositories(username)?;
    info!(username, count = repositories.len(), "listed repositories");

    let analyzer = build_analyzer(config, client, cancel.clone())?;
    let mut batch = BatchAggregator::new(&analyzer, sink)
        .with_max_size_kb(config.limits.max_repository_size_kb)
        .with_cancel(cancel);
    if let Some(log) = &config.report.directory_log {
        batch = batch.with_directory_log(log);
    }
    Ok(batch.run(username, &repositories, &config.exclusion_rules()))
}

/// Analyze one repository and wrap the outcome as a single-entry report.
///
/// # Errors
/// Returns an error only if the pipeline cannot be assembled; an analysis
/// failure is recorded in the report.
pub fn analyze_repository(
    config: &Config,
    owner: &str,
    repo: &str,
    client: Arc<dyn HttpClient>,
) -> Result<UserReport> {
    let analyzer = build_analyzer(config, client, CancelFlag::new())?;
    let mut report = UserReport::new(owner);
    match analyzer.analyze(owner, repo, &config.exclusion_rules()) {
        Ok(outcome) => {
            if let Some(log) = &config.report.directory_log {
                append_census(log, repo, &outcome.directories);
            }
            report.absorb(repo, &outcome);
        }
        Err(e) => report.failures.push(RepositoryFailure {
            name: repo.to_string(),
            kind: e.kind().to_string(),
            message: e.to_string(),
        }),
    }
    Ok(report)
}

fn emit_report(report: &UserReport, run: &RunArgs) -> Result<()> {
    let content = run.format.formatter().format(report)?;
    write_output(run.output.as_deref(), &content)
}

/// Write `content` to `path`, or to stdout when no path is given.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            info!(path = %p.display(), "report written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "analyze_tests.rs"]
mod tests;

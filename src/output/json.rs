use serde::Serialize;

use crate::batch::{RepositoryFailure, SkippedRepository, UserReport};
use crate::error::Result;

use super::{ReportFormatter, languages_by_loc};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    username: &'a str,
    summary: JsonSummary,
    by_language: Vec<JsonLanguage<'a>>,
    analyzed: &'a [String],
    skipped: &'a [SkippedRepository],
    failures: &'a [RepositoryFailure],
    cancelled: bool,
}

#[derive(Serialize)]
struct JsonSummary {
    repositories: usize,
    loc: u64,
    comments: u64,
    blanks: u64,
}

#[derive(Serialize)]
struct JsonLanguage<'a> {
    extension: &'a str,
    loc: u64,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &UserReport) -> Result<String> {
        let output = JsonReport {
            username: &report.username,
            summary: JsonSummary {
                repositories: report.analyzed.len(),
                loc: report.loc,
                comments: report.comments,
                blanks: report.blanks,
            },
            by_language: languages_by_loc(&report.loc_by_language)
                .into_iter()
                .map(|(extension, loc)| JsonLanguage { extension, loc })
                .collect(),
            analyzed: &report.analyzed,
            skipped: &report.skipped,
            failures: &report.failures,
            cancelled: report.cancelled,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;

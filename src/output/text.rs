use std::io::Write;

use crate::batch::UserReport;
use crate::error::Result;

use super::{ReportFormatter, languages_by_loc};

/// Label shown for files without an extension.
pub const NO_EXTENSION_LABEL: &str = "(none)";

pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &UserReport) -> Result<String> {
        let mut output = Vec::new();

        writeln!(output, "Lines of code for {}", report.username).ok();
        writeln!(output).ok();

        let languages = languages_by_loc(&report.loc_by_language);
        if !languages.is_empty() {
            let width = languages
                .iter()
                .map(|(ext, _)| label(ext).len())
                .max()
                .unwrap_or(0);
            writeln!(output, "By Language:").ok();
            for (ext, loc) in languages {
                writeln!(output, "  {:<width$}  {loc:>10}", label(ext)).ok();
            }
            writeln!(output).ok();
        }

        writeln!(output, "Summary:").ok();
        writeln!(output, "  Repositories analyzed: {}", report.analyzed.len()).ok();
        writeln!(output, "  Code: {}", report.loc).ok();
        writeln!(output, "  Comments: {}", report.comments).ok();
        writeln!(output, "  Blank: {}", report.blanks).ok();

        if !report.skipped.is_empty() {
            writeln!(output).ok();
            writeln!(output, "Skipped ({}):", report.skipped.len()).ok();
            for skipped in &report.skipped {
                writeln!(output, "  {}: {}", skipped.name, skipped.reason).ok();
            }
        }

        if !report.failures.is_empty() {
            writeln!(output).ok();
            writeln!(output, "Failed ({}):", report.failures.len()).ok();
            for failure in &report.failures {
                writeln!(output, "  {}: {}", failure.name, failure.message).ok();
            }
        }

        if report.cancelled {
            writeln!(output).ok();
            writeln!(output, "Cancelled: totals are partial.").ok();
        }

        Ok(String::from_utf8_lossy(&output).to_string())
    }
}

fn label(ext: &str) -> &str {
    if ext.is_empty() { NO_EXTENSION_LABEL } else { ext }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;

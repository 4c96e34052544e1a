mod json;
mod progress;
mod text;

pub use json::JsonFormatter;
pub use progress::RepositoryProgress;
pub use text::{NO_EXTENSION_LABEL, TextFormatter};

use std::collections::HashMap;

use crate::batch::UserReport;
use crate::error::Result;

/// Trait for rendering a finished report.
pub trait ReportFormatter {
    /// Format the report into a string.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, report: &UserReport) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn formatter(self) -> Box<dyn ReportFormatter> {
        match self {
            Self::Text => Box::new(TextFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Per-extension line counts, largest first, ties by extension.
#[must_use]
pub fn languages_by_loc(loc_by_language: &HashMap<String, u64>) -> Vec<(&str, u64)> {
    let mut languages: Vec<(&str, u64)> = loc_by_language
        .iter()
        .map(|(ext, loc)| (ext.as_str(), *loc))
        .collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    languages
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::error::{RepoLocError, Result};

const HEADER_PREFIX: &str = "Repository:";

/// Render one repository's directory tally: a header, then `name: count`
/// lines with the most common names first, then a blank line.
///
/// Ties are ordered by name so the output is stable.
#[must_use]
pub fn render_census(repo: &str, directories: &HashMap<String, usize>) -> String {
    let mut entries: Vec<(&String, &usize)> = directories.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut output = format!("{HEADER_PREFIX} {repo}\n");
    for (name, count) in entries {
        writeln!(output, "{name}: {count}").ok();
    }
    output.push('\n');
    output
}

/// Append a census block to `log`. Failures are logged, never returned.
pub fn append_census(log: &Path, repo: &str, directories: &HashMap<String, usize>) {
    let block = render_census(repo, directories);
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .and_then(|mut file| file.write_all(block.as_bytes()));
    if let Err(e) = result {
        warn!(path = %log.display(), repo, error = %e, "failed to write directory log");
    }
}

/// Sum the directory counts of every repository block in a census log.
///
/// Lines before the first header are ignored. The count is taken after the
/// last `:` so directory names may contain colons.
///
/// # Errors
/// Returns [`RepoLocError::CensusParse`] for an entry without a numeric count.
pub fn parse_census(text: &str) -> Result<BTreeMap<String, usize>> {
    let mut totals = BTreeMap::new();
    let mut in_block = false;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.starts_with(HEADER_PREFIX) {
            in_block = true;
            continue;
        }
        if !in_block || line.is_empty() {
            continue;
        }

        let malformed = |reason: String| RepoLocError::CensusParse {
            line: index + 1,
            reason,
        };
        let (name, count) = line
            .rsplit_once(':')
            .ok_or_else(|| malformed(format!("expected 'name: count', got '{line}'")))?;
        let count: usize = count
            .trim()
            .parse()
            .map_err(|e| malformed(format!("invalid count '{}': {e}", count.trim())))?;
        *totals.entry(name.trim().to_string()).or_insert(0) += count;
    }

    Ok(totals)
}

/// Read and aggregate the census log at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or is malformed.
pub fn read_census(path: &Path) -> Result<BTreeMap<String, usize>> {
    parse_census(&fs::read_to_string(path)?)
}

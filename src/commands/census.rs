use std::collections::BTreeMap;

use crate::batch::read_census;
use crate::cli::CensusArgs;
use crate::{EXIT_ERROR, EXIT_SUCCESS, Result};

use super::analyze::write_output;

#[must_use]
pub fn run_census(args: &CensusArgs) -> i32 {
    match run_census_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}

fn run_census_impl(args: &CensusArgs) -> Result<()> {
    let totals = read_census(&args.log)?;
    write_output(args.output.as_deref(), &format_census(&totals)?)
}

/// Pretty JSON object of directory name to total count.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn format_census(totals: &BTreeMap<String, usize>) -> Result<String> {
    let mut json = serde_json::to_string_pretty(totals)?;
    json.push('\n');
    Ok(json)
}

use std::io::Write;

use crate::scanner::{DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_EXTENSIONS};
use crate::EXIT_SUCCESS;

#[must_use]
pub fn run_defaults() -> i32 {
    print!("{}", format_defaults());
    EXIT_SUCCESS
}

/// The built-in deny-lists, one entry per line under a heading each.
#[must_use]
pub fn format_defaults() -> String {
    let mut output = Vec::new();
    writeln!(output, "Ignored directories ({}):", DEFAULT_IGNORE_DIRS.len()).ok();
    for dir in DEFAULT_IGNORE_DIRS {
        writeln!(output, "  {dir}").ok();
    }
    writeln!(output).ok();
    writeln!(output, "Ignored extensions ({}):", DEFAULT_IGNORE_EXTENSIONS.len()).ok();
    for ext in DEFAULT_IGNORE_EXTENSIONS {
        writeln!(output, "  {ext}").ok();
    }
    String::from_utf8_lossy(&output).to_string()
}

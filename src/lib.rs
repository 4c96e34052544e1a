pub mod analyzer;
pub mod batch;
pub mod branch;
pub mod cancel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use error::{RepoLocError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL_FAILURE: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

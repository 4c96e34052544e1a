#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the repo-loc binary.
#[macro_export]
macro_rules! repo_loc {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("repo-loc"))
    };
}

/// Provider endpoint that refuses connections immediately.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1";

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Creates a new test fixture with an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Returns the path to the temp directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates a `.repo-loc.toml` in the temp directory.
    pub fn create_config(&self, content: &str) {
        self.create_file(".repo-loc.toml", content);
    }

    /// Config pointing every provider URL at a closed local port and keeping
    /// the branch cache inside the fixture.
    pub fn create_offline_config(&self) {
        let cache_dir = self.path().join("cache");
        self.create_config(&format!(
            "[provider]\napi_base = \"{UNREACHABLE_API}\"\narchive_base = \"{UNREACHABLE_API}\"\n\n\
             [limits]\nrequest_timeout_secs = 2\n\n\
             [cache]\ndir = \"{}\"\n",
            cache_dir.display().to_string().replace('\\', "/")
        ));
    }
}

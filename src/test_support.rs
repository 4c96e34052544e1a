//! Shared fixtures for unit tests: a routed mock HTTP client and an
//! in-memory zip builder.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::HttpError;
use crate::http::{HttpClient, HttpResponse};

/// Mock HTTP client answering from a fixed route table.
///
/// Unrouted URLs answer 404. Every request is recorded.
#[derive(Default)]
pub struct MockHttpClient {
    routes: HashMap<String, std::result::Result<HttpResponse, HttpError>>,
    calls: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        );
        self
    }

    pub fn fail(mut self, url: &str, error: HttpError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }
}

impl HttpClient for MockHttpClient {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes.get(url).cloned().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                body: b"Not Found".to_vec(),
            })
        })
    }
}

/// Build a zip archive from `(path, content)` pairs. Paths ending in `/`
/// become directory entries.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, content) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).unwrap();
        } else {
            writer.start_file(*path, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Metadata body as served by the provider's repository endpoint.
pub fn metadata_body(default_branch: &str) -> String {
    format!(r#"{{"name":"repo","default_branch":"{default_branch}","size":10}}"#)
}

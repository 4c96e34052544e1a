use std::collections::HashMap;

use tempfile::TempDir;

use super::*;
use crate::batch::RecordingSink;
use crate::test_support::{MockHttpClient, metadata_body, zip_archive};

const LISTING: &str = "https://api.github.com/users/octo/repos?per_page=100&page=1";

fn offline_config() -> Config {
    let mut config = Config::default();
    config.cache.enabled = false;
    config
}

fn repository_routes(client: MockHttpClient, repo: &str, files: &[(&str, &str)]) -> MockHttpClient {
    let entries: Vec<(String, &str)> = files
        .iter()
        .map(|(path, content)| (format!("{repo}-main/{path}"), *content))
        .collect();
    let entries: Vec<(&str, &str)> = entries.iter().map(|(p, c)| (p.as_str(), *c)).collect();
    client
        .respond(
            &format!("https://api.github.com/repos/octo/{repo}"),
            200,
            metadata_body("main"),
        )
        .respond(
            &format!("https://github.com/octo/{repo}/archive/refs/heads/main.zip"),
            200,
            zip_archive(&entries),
        )
}

#[test]
fn user_batch_end_to_end() {
    let client = MockHttpClient::new().respond(
        LISTING,
        200,
        r#"[
            {"name":"alpha","size":10,"fork":false},
            {"name":"beta","size":10,"fork":false},
            {"name":"forked","size":10,"fork":true},
            {"name":"broken","size":10,"fork":false}
        ]"#,
    );
    let client = repository_routes(client, "alpha", &[("app.js", "let a;\nlet b;\n// c\n")]);
    let client = repository_routes(client, "beta", &[("main.py", "x = 1\n\n"), ("lib.js", "f();\n")]);
    let client = Arc::new(client);
    let sink = RecordingSink::new();

    let report = analyze_user(&offline_config(), "octo", client, &sink, CancelFlag::new()).unwrap();

    assert_eq!(report.analyzed, vec!["alpha", "beta"]);
    assert_eq!(report.loc, 4);
    assert_eq!(report.comments, 1);
    assert_eq!(report.blanks, 1);
    assert_eq!(
        report.loc_by_language,
        HashMap::from([(".js".to_string(), 3), (".py".to_string(), 1)])
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "broken");
    assert_eq!(report.failures[0].kind, "RepositoryMetadata");
    assert!(!sink.events().is_empty());
}

#[test]
fn listing_failure_is_an_error() {
    let client = Arc::new(MockHttpClient::new().respond(LISTING, 404, "Not Found"));
    let err = analyze_user(&offline_config(), "octo", client, &RecordingSink::new(), CancelFlag::new())
        .unwrap_err();
    assert_eq!(err.kind(), "Listing");
}

#[test]
fn directory_log_written_for_user_batch() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("dirs.log");
    let mut config = offline_config();
    config.report.directory_log = Some(log.clone());

    let client = MockHttpClient::new().respond(LISTING, 200, r#"[{"name":"alpha","size":1}]"#);
    let client = Arc::new(repository_routes(client, "alpha", &[("src/lib.rs", "fn a() {}\n")]));

    analyze_user(&config, "octo", client, &RecordingSink::new(), CancelFlag::new()).unwrap();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.starts_with("Repository: alpha\n"));
    assert!(content.contains("src: 1\n"));
}

#[test]
fn single_repository_success() {
    let client = Arc::new(repository_routes(
        MockHttpClient::new(),
        "hello",
        &[("main.py", "# comment\n\ncode_line\n")],
    ));

    let report = analyze_repository(&offline_config(), "octo", "hello", client).unwrap();

    assert_eq!(report.loc, 1);
    assert_eq!(report.comments, 1);
    assert_eq!(report.blanks, 1);
    assert_eq!(report.analyzed, vec!["hello"]);
    assert!(!report.has_failures());
}

#[test]
fn single_repository_failure_is_recorded() {
    let client = Arc::new(
        MockHttpClient::new().respond(
            "https://api.github.com/repos/octo/hello",
            200,
            metadata_body("main"),
        ),
    );

    let report = analyze_repository(&offline_config(), "octo", "hello", client).unwrap();

    assert!(report.has_failures());
    assert_eq!(report.failures[0].kind, "SnapshotDownload");
    assert_eq!(report_exit_code(Ok(report)), EXIT_PARTIAL_FAILURE);
}

#[test]
fn exit_codes() {
    assert_eq!(report_exit_code(Ok(UserReport::new("octo"))), EXIT_SUCCESS);
    assert_eq!(
        report_exit_code(Err(crate::error::RepoLocError::Config("bad".to_string()))),
        EXIT_ERROR
    );
}

#[test]
fn write_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");
    write_output(Some(&path), "hello\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
}

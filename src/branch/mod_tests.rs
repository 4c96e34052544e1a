use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use super::*;
use crate::error::HttpError;
use crate::test_support::{MockHttpClient, metadata_body};

const HELLO_URL: &str = "https://api.github.com/repos/octo/hello";

fn resolver(client: MockHttpClient) -> (BranchResolver, Arc<MockHttpClient>) {
    let client = Arc::new(client);
    let resolver = BranchResolver::new(client.clone(), Arc::new(BranchCache::in_memory()));
    (resolver, client)
}

#[test]
fn resolves_default_branch_field() {
    let (resolver, _) = resolver(MockHttpClient::new().respond(HELLO_URL, 200, metadata_body("main")));
    assert_eq!(resolver.resolve_default_branch("octo", "hello").unwrap(), "main");
}

#[test]
fn missing_field_falls_back_to_master() {
    let (resolver, _) = resolver(MockHttpClient::new().respond(HELLO_URL, 200, r#"{"name":"hello"}"#));
    assert_eq!(
        resolver.resolve_default_branch("octo", "hello").unwrap(),
        FALLBACK_BRANCH
    );
}

#[test]
fn second_call_within_window_uses_cache() {
    let (resolver, client) =
        resolver(MockHttpClient::new().respond(HELLO_URL, 200, metadata_body("develop")));

    let first = resolver.resolve_default_branch("octo", "hello").unwrap();
    let second = resolver.resolve_default_branch("octo", "hello").unwrap();

    assert_eq!(first, second);
    assert_eq!(client.call_count(), 1);
}

#[test]
fn cache_is_keyed_by_owner_and_repo() {
    let other = "https://api.github.com/repos/octo/world";
    let (resolver, client) = resolver(
        MockHttpClient::new()
            .respond(HELLO_URL, 200, metadata_body("main"))
            .respond(other, 200, metadata_body("trunk")),
    );

    assert_eq!(resolver.resolve_default_branch("octo", "hello").unwrap(), "main");
    assert_eq!(resolver.resolve_default_branch("octo", "world").unwrap(), "trunk");
    assert_eq!(client.call_count(), 2);
}

#[test]
fn expired_entry_triggers_new_lookup() {
    let (resolver, client) =
        resolver(MockHttpClient::new().respond(HELLO_URL, 200, metadata_body("main")));
    resolver.cache().insert(
        "octo",
        "hello",
        BranchCacheEntry {
            branch: "stale".to_string(),
            expires_at: Utc::now() - TimeDelta::seconds(1),
        },
    );

    assert_eq!(resolver.resolve_default_branch("octo", "hello").unwrap(), "main");
    assert_eq!(client.call_count(), 1);
}

#[test]
fn non_success_status_is_metadata_error() {
    let (resolver, _) = resolver(MockHttpClient::new().respond(HELLO_URL, 403, "rate limited"));
    let err = resolver.resolve_default_branch("octo", "hello").unwrap_err();

    assert!(matches!(err, RepoLocError::RepositoryMetadata { status: Some(403), .. }));
    assert!(resolver.cache().get("octo", "hello").is_none());
}

#[test]
fn transport_failure_is_metadata_error() {
    let (resolver, _) = resolver(
        MockHttpClient::new().fail(HELLO_URL, HttpError::Timeout(HELLO_URL.to_string())),
    );
    let err = resolver.resolve_default_branch("octo", "hello").unwrap_err();

    assert!(matches!(err, RepoLocError::RepositoryMetadata { status: None, .. }));
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn malformed_body_is_metadata_error() {
    let (resolver, _) = resolver(MockHttpClient::new().respond(HELLO_URL, 200, "<html>"));
    let err = resolver.resolve_default_branch("octo", "hello").unwrap_err();
    assert!(err.to_string().contains("invalid response"));
}

#[test]
fn custom_api_base_is_used() {
    let client = Arc::new(
        MockHttpClient::new().respond("http://localhost:9/api/repos/o/r", 200, metadata_body("main")),
    );
    let resolver = BranchResolver::new(client.clone(), Arc::new(BranchCache::in_memory()))
        .with_api_base("http://localhost:9/api/");

    assert_eq!(resolver.resolve_default_branch("o", "r").unwrap(), "main");
}

#[test]
fn invalid_api_base_is_metadata_error() {
    let client = Arc::new(MockHttpClient::new());
    let resolver = BranchResolver::new(client.clone(), Arc::new(BranchCache::in_memory()))
        .with_api_base("not a url");

    let err = resolver.resolve_default_branch("o", "r").unwrap_err();
    assert!(matches!(err, RepoLocError::RepositoryMetadata { status: None, .. }));
    assert_eq!(client.call_count(), 0);
}

#[test]
fn concurrent_resolutions_share_cache() {
    let (resolver, client) =
        resolver(MockHttpClient::new().respond(HELLO_URL, 200, metadata_body("main")));
    resolver.resolve_default_branch("octo", "hello").unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                assert_eq!(resolver.resolve_default_branch("octo", "hello").unwrap(), "main");
            });
        }
    });
    assert_eq!(client.call_count(), 1);
}

#[test]
fn failed_persist_does_not_fail_resolution() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // a regular file cannot hold the cache subdirectory
    let cache = Arc::new(BranchCache::persistent(file.path()));
    let client = Arc::new(MockHttpClient::new().respond(HELLO_URL, 200, metadata_body("main")));
    let resolver = BranchResolver::new(client, cache);

    assert_eq!(resolver.resolve_default_branch("octo", "hello").unwrap(), "main");
    assert_eq!(resolver.cache().get("octo", "hello").as_deref(), Some("main"));
}

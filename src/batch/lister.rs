use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::branch::DEFAULT_API_BASE;
use crate::error::{HttpError, RepoLocError, Result};
use crate::http::{HttpClient, endpoint};

/// Page size requested from the listing endpoint; a shorter page is the last.
pub const PAGE_SIZE: usize = 100;

/// One entry of a user's repository list, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    /// Size in kilobytes.
    #[serde(rename = "size", default)]
    pub size_kb: u64,
    #[serde(rename = "fork", default)]
    pub is_fork: bool,
}

impl RepositorySummary {
    #[must_use]
    pub fn new(name: impl Into<String>, size_kb: u64, is_fork: bool) -> Self {
        Self {
            name: name.into(),
            size_kb,
            is_fork,
        }
    }
}

/// Source of a user's repository list.
pub trait RepositoryLister {
    /// List every repository owned by `username`.
    ///
    /// # Errors
    /// Returns [`RepoLocError::Listing`] if any page cannot be fetched or parsed.
    fn list_repositories(&self, username: &str) -> Result<Vec<RepositorySummary>>;
}

/// Paginated lister over the provider's `users/{name}/repos` endpoint.
pub struct GitHubLister {
    client: Arc<dyn HttpClient>,
    api_base: String,
}

impl GitHubLister {
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of one listing page.
    ///
    /// # Errors
    /// Returns an error if the API base is not a usable URL.
    pub fn page_url(&self, username: &str, page: usize) -> std::result::Result<String, HttpError> {
        let mut url = endpoint(&self.api_base, ["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url.into())
    }

    fn fetch_page(&self, username: &str, page: usize) -> Result<Vec<RepositorySummary>> {
        let listing_error = |status: Option<u16>, reason: String| RepoLocError::Listing {
            username: username.to_string(),
            status,
            reason,
        };

        let url = self
            .page_url(username, page)
            .map_err(|e| listing_error(None, e.to_string()))?;
        let response = self
            .client
            .get(&url)
            .map_err(|e| listing_error(None, e.to_string()))?;
        if !response.is_success() {
            return Err(listing_error(
                Some(response.status),
                format!("HTTP {}", response.status),
            ));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| listing_error(Some(response.status), format!("invalid response: {e}")))
    }
}

impl RepositoryLister for GitHubLister {
    fn list_repositories(&self, username: &str) -> Result<Vec<RepositorySummary>> {
        let mut repositories = Vec::new();
        for page in 1.. {
            let batch = self.fetch_page(username, page)?;
            let last = batch.len() < PAGE_SIZE;
            debug!(username, page, count = batch.len(), "fetched repository page");
            repositories.extend(batch);
            if last {
                break;
            }
        }
        Ok(repositories)
    }
}

#[cfg(test)]
#[path = "lister_tests.rs"]
mod tests;

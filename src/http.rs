use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::error::{HttpError, RepoLocError, Result};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("repo-loc/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Append `segments` to the path of `base`, percent-encoding each one.
///
/// A segment never introduces a `/`, `?` or `#` of its own.
///
/// # Errors
/// Returns [`HttpError::InvalidUrl`] if `base` is not an absolute URL with a path.
pub fn endpoint<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> std::result::Result<Url, HttpError> {
    let invalid = |message: String| HttpError::InvalidUrl {
        url: base.to_string(),
        message,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// HTTP client abstraction for dependency injection.
///
/// Implementations must apply a bounded timeout; a non-success status is a
/// normal response, only transport failures are errors.
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and return status and body.
    ///
    /// # Errors
    /// Returns an error on timeout, connection failure or a broken body stream.
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError>;
}

/// Production HTTP client using reqwest.
///
/// This implementation cannot be unit tested without a real HTTP server,
/// so it is excluded from coverage measurement.
#[derive(Debug)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl ReqwestClient {
    /// Build a client with the given timeout and optional bearer token.
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RepoLocError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, token })
    }
}

#[cfg(not(tarpaulin_include))]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let mut response = request.send().map_err(|e| classify_error(url, &e))?;
        let status = response.status().as_u16();

        let mut body = Vec::new();
        if let Some(len) = response.content_length() {
            body.reserve(usize::try_from(len).unwrap_or(0));
        }
        response
            .read_to_end(&mut body)
            .map_err(|e| HttpError::Request {
                url: url.to_string(),
                message: format!("failed to read response body: {e}"),
            })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(not(tarpaulin_include))]
fn classify_error(url: &str, e: &reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout(url.to_string())
    } else if e.is_connect() {
        HttpError::Connect(url.to_string())
    } else {
        HttpError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

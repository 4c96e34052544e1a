use std::path::PathBuf;

use thiserror::Error;

/// Transport-level failure of a single HTTP request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("request failed for {url}: {message}")]
    Request { url: String, message: String },

    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

#[derive(Error, Debug)]
pub enum RepoLocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to resolve default branch of {owner}/{repo}: {reason}")]
    RepositoryMetadata {
        owner: String,
        repo: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Failed to download snapshot of {owner}/{repo}@{branch}: {reason}")]
    SnapshotDownload {
        owner: String,
        repo: String,
        branch: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Failed to extract snapshot of {repo}: {reason}")]
    Extraction { repo: String, reason: String },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list repositories of {username}: {reason}")]
    Listing {
        username: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Workspace error at {path}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed directory log at line {line}: {reason}")]
    CensusParse { line: usize, reason: String },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl RepoLocError {
    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::RepositoryMetadata { .. } => "RepositoryMetadata",
            Self::SnapshotDownload { .. } => "SnapshotDownload",
            Self::Extraction { .. } => "Extraction",
            Self::FileRead { .. } => "FileRead",
            Self::Listing { .. } => "Listing",
            Self::Workspace { .. } => "Workspace",
            Self::CensusParse { .. } => "CensusParse",
            Self::Cancelled => "Cancelled",
            Self::Io(_) => "Io",
            Self::TomlParse(_) => "TomlParse",
            Self::JsonSerialize(_) => "JsonSerialize",
        }
    }

    /// HTTP status carried by provider-facing errors, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RepositoryMetadata { status, .. }
            | Self::SnapshotDownload { status, .. }
            | Self::Listing { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoLocError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

//! Error types
//!
//! Every fallible operation in the library returns [`Error`]. The variants are grouped by
//! where the failure happened: reading definitions, bootstrapping a session, talking to
//! the admin API, or a lookup that found nothing.

use std::path::PathBuf;

use reqwest::{Method, StatusCode};

use crate::definition::InterpolationError;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Definition errors, raised before any network call
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse target list {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("variable substitution failed in {}: {source}", path.display())]
    Interpolation {
        path: PathBuf,
        #[source]
        source: InterpolationError,
    },

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    // Authentication bootstrap
    #[error("could not find {marker} in {page} page")]
    MarkerNotFound {
        marker: &'static str,
        page: &'static str,
    },

    #[error("login rejected: {status}")]
    LoginRejected { status: StatusCode },

    // Remote protocol
    #[error("{method} {url} failed: {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Local lookups
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    // Caller input
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// True for locally synthesized "no such resource" results
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// HTTP status of a remote failure, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } | Error::LoginRejected { status } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}

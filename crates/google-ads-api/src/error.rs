//! Error Types
//!
//! Every fallible operation in this crate returns [`AdsResult`]. Variants map
//! one-to-one onto the failure classes a tool caller can act on.

use std::path::PathBuf;

/// Errors raised while talking to the Google Ads API
#[derive(Debug, thiserror::Error)]
pub enum AdsError {
    /// Static configuration is missing or empty
    #[error("missing configuration: {0} is required")]
    Configuration(String),

    #[error("credentials file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load credentials from {}: {reason}", .path.display())]
    CredentialLoad { path: PathBuf, reason: String },

    #[error("failed to refresh access token: {0}")]
    AuthRefresh(String),

    /// Non-200 response; `body` is the response text, unmodified
    #[error("Google Ads API returned HTTP {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("no resource name returned by {0}")]
    MissingResource(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl AdsError {
    /// Stable machine-readable name for the error class
    pub fn kind(&self) -> &'static str {
        match self {
            AdsError::Configuration(_) => "configuration",
            AdsError::NotFound(_) => "not_found",
            AdsError::CredentialLoad { .. } => "credential_load",
            AdsError::AuthRefresh(_) => "auth_refresh",
            AdsError::RemoteApi { .. } => "remote_api",
            AdsError::MissingResource(_) => "missing_resource",
            AdsError::InvalidArgument(_) => "invalid_argument",
            AdsError::Transport(_) => "transport",
            AdsError::Decode(_) => "decode",
        }
    }
}

/// Result alias used across the crate
pub type AdsResult<T> = Result<T, AdsError>;

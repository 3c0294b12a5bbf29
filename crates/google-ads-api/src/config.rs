//! Client configuration
//!
//! Built once at startup and shared by every request. Values may be empty;
//! validation happens lazily when a request needs them.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "googleads.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v21";
pub const ADWORDS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AdsConfig {
    /// Service account key file
    pub credentials_path: Option<PathBuf>,
    pub developer_token: String,
    /// Manager account the requests are made on behalf of
    pub login_customer_id: String,
    /// Host (or full `scheme://host[:port]` base) of the REST API
    pub api_host: String,
    pub api_version: String,
    pub scopes: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            developer_token: String::new(),
            login_customer_id: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            scopes: vec![ADWORDS_SCOPE.to_string()],
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AdsConfig {
    pub fn new(
        credentials_path: Option<PathBuf>,
        developer_token: impl Into<String>,
        login_customer_id: impl Into<String>,
    ) -> Self {
        Self {
            credentials_path,
            developer_token: developer_token.into(),
            login_customer_id: login_customer_id.into(),
            ..Self::default()
        }
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

//! Service Account Credentials
//!
//! Loads a Google service-account key file and exchanges a signed JWT
//! assertion for an OAuth access token (two-legged flow). Nothing is cached:
//! callers load and refresh once per request.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{AdsError, AdsResult};
use crate::transport::Transport;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    key_type: Option<String>,
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// A loaded service account plus the most recently issued access token.
pub struct Credential {
    client_email: String,
    key_id: Option<String>,
    signing_key: EncodingKey,
    token_uri: String,
    scopes: Vec<String>,
    token: Option<String>,
    expiry: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("scopes", &self.scopes)
            .field("has_token", &self.token.is_some())
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl Credential {
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Access token from the last successful refresh
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Exchange a freshly signed assertion for a new access token.
    pub async fn refresh(&mut self, transport: &dyn Transport) -> AdsResult<()> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: self.scopes.join(" "),
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        let assertion = jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .map_err(|e| AdsError::AuthRefresh(format!("failed to sign assertion: {}", e)))?;

        debug!(client_email = %self.client_email(), token_uri = %self.token_uri(), "Refreshing access token");

        let response = transport
            .post_form(
                &self.token_uri,
                &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
            )
            .await
            .map_err(|e| AdsError::AuthRefresh(e.to_string()))?;

        if !(200..300).contains(&response.status) {
            error!("Token endpoint returned HTTP {}: {}", response.status, response.body);
            return Err(AdsError::AuthRefresh(format!(
                "HTTP {} error: {}",
                response.status, response.body
            )));
        }

        let (token, expires_in) = parse_token_response(&response.body)?;
        self.token = Some(token);
        self.expiry = Some(now + Duration::seconds(expires_in));
        Ok(())
    }
}

/// Load a service-account credential from `path` for the given scopes.
pub fn get_credentials(path: &Path, scopes: &[String]) -> AdsResult<Credential> {
    if path.as_os_str().is_empty() {
        return Err(AdsError::Configuration("credentials_path".to_string()));
    }

    if scopes.is_empty() {
        return Err(AdsError::Configuration("scopes".to_string()));
    }

    if !path.exists() {
        return Err(AdsError::NotFound(path.to_path_buf()));
    }

    let load_error = |reason: String| AdsError::CredentialLoad {
        path: PathBuf::from(path),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let key: ServiceAccountKey = serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

    if let Some(kind) = key.key_type.as_deref() {
        if kind != "service_account" {
            return Err(load_error(format!("expected a service_account key, found {}", kind)));
        }
    }

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| load_error(format!("invalid private key: {}", e)))?;

    Ok(Credential {
        client_email: key.client_email,
        key_id: key.private_key_id,
        signing_key,
        token_uri: key.token_uri,
        scopes: scopes.to_vec(),
        token: None,
        expiry: None,
    })
}

/// Parse a token endpoint response into `(access_token, expires_in_secs)`.
fn parse_token_response(body: &str) -> AdsResult<(String, i64)> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AdsError::AuthRefresh(format!("invalid JSON response: {}", e)))?;

    if let Some(err) = parsed.get("error").and_then(|v| v.as_str()) {
        let desc = parsed
            .get("error_description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        return Err(AdsError::AuthRefresh(format!("{}: {}", err, desc)));
    }

    let access_token = parsed
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AdsError::AuthRefresh("missing access_token in response".to_string()))?
        .to_string();

    let expires_in = parsed
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);

    Ok((access_token, expires_in))
}

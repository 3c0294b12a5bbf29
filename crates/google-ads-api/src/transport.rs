//! HTTP transport
//!
//! The dispatch layer and the credential refresh talk to the network only
//! through [`Transport`], so every request can be observed or replaced.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{AdsError, AdsResult};
use crate::request::RequestHeaders;

/// Status and raw body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body with the given headers
    async fn post_json(&self, url: &str, headers: &RequestHeaders, body: &Value) -> AdsResult<HttpResponse>;

    /// POST a form-encoded body (token exchange)
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> AdsResult<HttpResponse>;
}

/// reqwest-backed transport. The inner client is reused across calls.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> AdsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AdsError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> AdsResult<HttpResponse> {
        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| AdsError::Transport(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, headers: &RequestHeaders, body: &Value) -> AdsResult<HttpResponse> {
        let mut builder = self.client.post(url).json(body);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AdsError::Transport(e.to_string()))?;

        Self::read(response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> AdsResult<HttpResponse> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| AdsError::Transport(e.to_string()))?;

        Self::read(response).await
    }
}

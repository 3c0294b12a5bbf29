//! Google Ads API Dispatch
//!
//! Every call loads the service account, refreshes its token, POSTs a JSON
//! body and unwraps the `{"results": [...]}` envelope. Searches and mutations
//! share one primitive so their status and empty-result handling stay identical.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::AdsConfig;
use crate::credentials::get_credentials;
use crate::customer::CustomerId;
use crate::error::{AdsError, AdsResult};
use crate::request::{build_headers, build_url, CONTENT_TYPE};
use crate::transport::{ReqwestTransport, Transport};

pub const SEARCH_OPERATION: &str = "googleAds:search";

/// Google Ads REST client. Cheap to clone; holds no per-call state.
#[derive(Clone)]
pub struct AdsClient {
    config: Arc<AdsConfig>,
    transport: Arc<dyn Transport>,
}

impl AdsClient {
    /// Create a client backed by reqwest with the configured timeout
    pub fn new(config: AdsConfig) -> AdsResult<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: AdsConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &AdsConfig {
        &self.config
    }

    /// Run a GAQL query against `customers/{id}/googleAds:search`.
    pub async fn run_query(&self, customer_id: &str, query: &str) -> AdsResult<Vec<Value>> {
        debug!(customer_id, query, "Running GAQL");
        self.execute_post(customer_id, SEARCH_OPERATION, &json!({ "query": query }))
            .await
    }

    /// POST a caller-built operations envelope to `customers/{id}/{operation_path}`.
    pub async fn run_mutation(&self, customer_id: &str, operation_path: &str, body: &Value) -> AdsResult<Vec<Value>> {
        self.execute_post(customer_id, operation_path, body).await
    }

    async fn execute_post(&self, customer_id: &str, operation: &str, body: &Value) -> AdsResult<Vec<Value>> {
        let customer = CustomerId::new(customer_id);
        let result = self.send(&customer, operation, body).await;
        if let Err(ref e) = result {
            error!(operation, customer_id = %customer, kind = e.kind(), "Google Ads request failed: {}", e);
        }
        result
    }

    async fn send(&self, customer: &CustomerId, operation: &str, body: &Value) -> AdsResult<Vec<Value>> {
        let path = self
            .config
            .credentials_path
            .as_deref()
            .unwrap_or_else(|| Path::new(""));
        let mut credential = get_credentials(path, &self.config.scopes)?;

        let mut headers = build_headers(
            &self.config.developer_token,
            &self.config.login_customer_id,
            &mut credential,
            self.transport.as_ref(),
        )
        .await?;
        headers.insert(CONTENT_TYPE, "application/json");

        let url = build_url(&self.config.api_host, &self.config.api_version, customer.as_str(), operation);
        info!(url = %url, "Running POST request");
        debug!(body = %body, "Request body");

        let response = self.transport.post_json(&url, &headers, body).await?;
        if response.status != 200 {
            return Err(AdsError::RemoteApi {
                status: response.status,
                body: response.body,
            });
        }

        unwrap_results(&response.body)
    }
}

/// Extract the `results` array; an absent or null key means no results.
fn unwrap_results(body: &str) -> AdsResult<Vec<Value>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let parsed: Value = serde_json::from_str(body).map_err(|e| AdsError::Decode(format!("{} (body: {})", e, body)))?;

    let Value::Object(mut envelope) = parsed else {
        return Err(AdsError::Decode(format!("expected a JSON object, got {}", body)));
    };

    match envelope.remove("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(results)) => Ok(results),
        Some(other) => Err(AdsError::Decode(format!("results is not an array: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdsConfig;
    use crate::request::{AUTHORIZATION, DEVELOPER_TOKEN, LOGIN_CUSTOMER_ID};
    use crate::testing::{harness, FakeTransport};

    #[tokio::test]
    async fn test_run_query_posts_query_to_search_endpoint() {
        let h = harness(FakeTransport::new().with_response(200, json!({"results": [{"campaign": {"id": "1"}}]})));

        let results = h.client.run_query("123-456-7890", "SELECT campaign.id FROM campaign").await.unwrap();
        assert_eq!(results, vec![json!({"campaign": {"id": "1"}})]);

        let requests = h.transport.json_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://googleads.example.test/v21/customers/1234567890/googleAds:search"
        );
        assert_eq!(requests[0].body, json!({"query": "SELECT campaign.id FROM campaign"}));
        assert_eq!(requests[0].headers.get(AUTHORIZATION), Some("Bearer ya29.test-token"));
        assert_eq!(requests[0].headers.get(DEVELOPER_TOKEN), Some("dev-token"));
        assert_eq!(requests[0].headers.get(LOGIN_CUSTOMER_ID), Some("1112223333"));
        assert_eq!(requests[0].headers.get(CONTENT_TYPE), Some("application/json"));
    }

    #[tokio::test]
    async fn test_missing_results_key_is_empty() {
        let h = harness(
            FakeTransport::new()
                .with_response(200, json!({"fieldMask": "campaign.id"}))
                .with_response(200, json!({"results": []}))
                .with_raw_response(200, ""),
        );

        for _ in 0..3 {
            let results = h.client.run_query("1", "SELECT customer.id FROM customer").await.unwrap();
            assert!(results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_non_200_is_remote_error_with_verbatim_body() {
        let body = r#"{"error":{"code":400,"message":"Request contains an invalid argument."}}"#;
        let h = harness(
            FakeTransport::new()
                .with_raw_response(400, body)
                .with_raw_response(201, r#"{"results": []}"#),
        );

        let err = h.client.run_query("1", "SELECT").await.unwrap_err();
        assert!(matches!(err, AdsError::RemoteApi { status: 400, body: ref b } if b == body));

        let err = h
            .client
            .run_mutation("1", "campaigns:mutate", &json!({"operations": []}))
            .await
            .unwrap_err();
        assert!(matches!(err, AdsError::RemoteApi { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_run_mutation_posts_body_verbatim() {
        let body = json!({"operations": [{"create": {"name": "Budget"}}]});
        let h = harness(FakeTransport::new().with_response(
            200,
            json!({"results": [{"resourceName": "customers/1/campaignBudgets/2"}]}),
        ));

        let results = h.client.run_mutation("987-654-3210", "campaignBudgets:mutate", &body).await.unwrap();
        assert_eq!(results[0]["resourceName"], "customers/1/campaignBudgets/2");

        let requests = h.transport.json_requests();
        assert_eq!(
            requests[0].url,
            "https://googleads.example.test/v21/customers/9876543210/campaignBudgets:mutate"
        );
        assert_eq!(requests[0].body, body);
        assert_eq!(requests[0].headers.get(CONTENT_TYPE), Some("application/json"));
    }

    #[tokio::test]
    async fn test_missing_credentials_file_sends_nothing() {
        let transport = Arc::new(FakeTransport::new());
        let config = AdsConfig::new(Some("/nonexistent/google-ads-key.json".into()), "dev", "1");
        let client = AdsClient::with_transport(config, transport.clone());

        let err = client.run_query("1", "SELECT customer.id FROM customer").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert!(transport.form_requests().is_empty());
        assert!(transport.json_requests().is_empty());
    }

    #[tokio::test]
    async fn test_unset_credentials_path_is_configuration_error() {
        let transport = Arc::new(FakeTransport::new());
        let client = AdsClient::with_transport(AdsConfig::new(None, "dev", "1"), transport.clone());

        let err = client.run_query("1", "SELECT").await.unwrap_err();
        assert!(matches!(err, AdsError::Configuration(ref f) if f == "credentials_path"));
        assert!(transport.json_requests().is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_stops_before_api_call() {
        let h = harness(FakeTransport::new().with_token_response(401, r#"{"error":"invalid_client"}"#));

        let err = h.client.run_query("1", "SELECT").await.unwrap_err();
        assert_eq!(err.kind(), "auth_refresh");
        assert!(h.transport.json_requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let h = harness(FakeTransport::new().with_transport_error("connection refused"));

        let err = h.client.run_query("1", "SELECT").await.unwrap_err();
        assert!(matches!(err, AdsError::Transport(ref m) if m == "connection refused"));
    }

    #[tokio::test]
    async fn test_each_call_refreshes_credentials() {
        let h = harness(FakeTransport::new());

        h.client.run_query("1", "SELECT").await.unwrap();
        h.client.run_query("1", "SELECT").await.unwrap();
        assert_eq!(h.transport.form_requests().len(), 2);
    }

    #[test]
    fn test_unwrap_results_rejects_malformed_bodies() {
        assert_eq!(unwrap_results("not json").unwrap_err().kind(), "decode");
        assert_eq!(unwrap_results("[1, 2]").unwrap_err().kind(), "decode");
        assert_eq!(unwrap_results(r#"{"results": {"a": 1}}"#).unwrap_err().kind(), "decode");
        assert!(unwrap_results(r#"{"results": null}"#).unwrap().is_empty());
    }
}

//! Request construction: authenticated headers and endpoint URLs.

use std::collections::BTreeMap;

use crate::credentials::Credential;
use crate::customer;
use crate::error::{AdsError, AdsResult};
use crate::transport::Transport;

pub const AUTHORIZATION: &str = "authorization";
pub const DEVELOPER_TOKEN: &str = "developer-token";
pub const LOGIN_CUSTOMER_ID: &str = "login-customer-id";
pub const CONTENT_TYPE: &str = "content-type";

/// Header name to value, built fresh for every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders(BTreeMap<String, String>);

impl RequestHeaders {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Refresh `credential` and assemble the headers every Ads API call needs.
pub async fn build_headers(
    developer_token: &str,
    login_customer_id: &str,
    credential: &mut Credential,
    transport: &dyn Transport,
) -> AdsResult<RequestHeaders> {
    if developer_token.trim().is_empty() {
        return Err(AdsError::Configuration("developer_token".to_string()));
    }

    let login_customer_id = customer::normalize(login_customer_id);
    if login_customer_id.is_empty() {
        return Err(AdsError::Configuration("login_customer_id".to_string()));
    }

    credential.refresh(transport).await?;
    let token = credential
        .token()
        .ok_or_else(|| AdsError::AuthRefresh("token endpoint issued no access token".to_string()))?;

    let mut headers = RequestHeaders::default();
    headers.insert(AUTHORIZATION, format!("Bearer {}", token));
    headers.insert(DEVELOPER_TOKEN, developer_token);
    headers.insert(LOGIN_CUSTOMER_ID, login_customer_id);
    Ok(headers)
}

/// `https://{host}/{version}/customers/{id}/{operation}` with the id normalized.
pub fn build_url(base_host: &str, api_version: &str, customer_id: &str, operation: &str) -> String {
    let base = base_host.trim_end_matches('/');
    let base = if base.contains("://") {
        base.to_string()
    } else {
        format!("https://{}", base)
    };

    format!(
        "{}/{}/customers/{}/{}",
        base,
        api_version,
        customer::normalize(customer_id),
        operation
    )
}

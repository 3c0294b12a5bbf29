//! Account classification and listing queries.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::client::AdsClient;
use crate::error::{AdsError, AdsResult};
use crate::queries;

impl AdsClient {
    /// Whether `customer_id` is a manager (aggregator) account.
    ///
    /// A manager queried for its customer clients lists itself first, so only
    /// `results[0].customerClient.manager` is inspected. No rows means a client
    /// account.
    pub async fn is_manager_account(&self, customer_id: &str) -> AdsResult<bool> {
        let results = self.run_query(customer_id, queries::CUSTOMER_CLIENTS).await?;
        let is_manager = manager_flag(&results, customer_id);

        if is_manager {
            info!(customer_id, "Customer account is a manager account");
        } else {
            info!(customer_id, "Customer account is a client account");
        }
        Ok(is_manager)
    }

    /// Non-manager accounts under `manager_customer_id`
    pub async fn list_client_accounts(&self, manager_customer_id: &str) -> AdsResult<Vec<Value>> {
        info!(manager_customer_id, "Listing client accounts for manager account");
        self.run_query(manager_customer_id, queries::CLIENT_ACCOUNTS).await
    }

    /// List campaigns, with performance metrics only for client accounts.
    pub async fn list_campaigns(&self, customer_id: &str) -> AdsResult<Vec<Value>> {
        let is_manager = self.is_manager_account(customer_id).await?;
        info!(customer_id, is_manager, "Listing campaigns");
        self.run_query(customer_id, queries::campaigns(is_manager)).await
    }

    pub async fn list_ad_groups(&self, customer_id: &str, campaign_id: Option<&str>) -> AdsResult<Vec<Value>> {
        let query = queries::ad_groups(campaign_id).inspect_err(|e| log_rejected("list_ad_groups", customer_id, e))?;
        info!(customer_id, campaign_id, "Listing ad groups");
        self.run_query(customer_id, &query).await
    }

    pub async fn list_ads(&self, customer_id: &str, ad_group_id: Option<&str>) -> AdsResult<Vec<Value>> {
        let query = queries::ads(ad_group_id).inspect_err(|e| log_rejected("list_ads", customer_id, e))?;
        info!(customer_id, ad_group_id, "Listing ads");
        self.run_query(customer_id, &query).await
    }
}

fn log_rejected(operation: &str, customer_id: &str, err: &AdsError) {
    error!(operation, customer_id, kind = err.kind(), "Google Ads request failed: {}", err);
}

fn manager_flag(results: &[Value], customer_id: &str) -> bool {
    let Some(first) = results.first() else {
        return false;
    };

    match first.pointer("/customerClient/manager").and_then(Value::as_bool) {
        Some(flag) => flag,
        None => {
            warn!(customer_id, "customerClient.manager missing from first result, assuming client account");
            false
        }
    }
}

//! Create operations
//!
//! Each wraps the caller's object as a single `create` operation. Campaign
//! creation chains two mutations: a budget first, then the campaign that
//! references it.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::client::AdsClient;
use crate::error::{AdsError, AdsResult};

pub const ASSETS: &str = "assets:mutate";
pub const AD_GROUP_ADS: &str = "adGroupAds:mutate";
pub const AD_GROUPS: &str = "adGroups:mutate";
pub const CAMPAIGN_BUDGETS: &str = "campaignBudgets:mutate";
pub const CAMPAIGNS: &str = "campaigns:mutate";

/// Daily amount for budgets synthesized during campaign creation
pub const DEFAULT_BUDGET_MICROS: u64 = 100_000;

/// `{"operations": [{"create": resource}]}`
pub fn create_operation(resource: Value) -> Value {
    json!({ "operations": [{ "create": resource }] })
}

impl AdsClient {
    pub async fn create_image_asset(&self, customer_id: &str, image_asset: Value) -> AdsResult<Vec<Value>> {
        self.run_mutation(customer_id, ASSETS, &create_operation(image_asset)).await
    }

    pub async fn create_ad(&self, customer_id: &str, ad: Value) -> AdsResult<Vec<Value>> {
        self.run_mutation(customer_id, AD_GROUP_ADS, &create_operation(ad)).await
    }

    pub async fn create_ad_group(&self, customer_id: &str, ad_group: Value) -> AdsResult<Vec<Value>> {
        self.run_mutation(customer_id, AD_GROUPS, &create_operation(ad_group)).await
    }

    pub async fn create_campaign_budget(&self, customer_id: &str, campaign_budget: Value) -> AdsResult<Vec<Value>> {
        self.run_mutation(customer_id, CAMPAIGN_BUDGETS, &create_operation(campaign_budget))
            .await
    }

    /// Create a budget, then a campaign bound to it.
    ///
    /// The campaign is never submitted unless the budget mutation returned a
    /// resource name.
    pub async fn create_display_campaign(&self, customer_id: &str, campaign: Value) -> AdsResult<Vec<Value>> {
        let Value::Object(mut campaign) = campaign else {
            let err = AdsError::InvalidArgument("campaign must be a JSON object".to_string());
            error!(operation = CAMPAIGNS, customer_id, kind = err.kind(), "Google Ads request failed: {}", err);
            return Err(err);
        };

        let budget = json!({
            "name": format!("Campaign Budget: {}", Utc::now().format("%Y-%m-%d %H:%M:%S%.3f")),
            "amountMicros": DEFAULT_BUDGET_MICROS,
            "deliveryMethod": "STANDARD",
        });
        let created = self.create_campaign_budget(customer_id, budget).await?;
        let budget_resource = first_resource_name(&created, CAMPAIGN_BUDGETS).inspect_err(|e| {
            error!(operation = CAMPAIGN_BUDGETS, customer_id, kind = e.kind(), "Google Ads request failed: {}", e);
        })?;
        info!(customer_id, budget = %budget_resource, "Created campaign budget");

        campaign.insert("campaignBudget".to_string(), Value::String(budget_resource));
        self.run_mutation(customer_id, CAMPAIGNS, &create_operation(Value::Object(campaign)))
            .await
    }
}

fn first_resource_name(results: &[Value], operation: &str) -> AdsResult<String> {
    results
        .first()
        .and_then(|r| r.get("resourceName"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .ok_or_else(|| AdsError::MissingResource(operation.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, FakeTransport, LogCapture};

    #[tokio::test]
    async fn test_create_wrappers_target_their_operations() {
        let h = harness(FakeTransport::new());

        h.client.create_image_asset("1", json!({"name": "logo"})).await.unwrap();
        h.client.create_ad("1", json!({"adGroup": "customers/1/adGroups/2"})).await.unwrap();
        h.client.create_ad_group("1", json!({"name": "group"})).await.unwrap();
        h.client.create_campaign_budget("1", json!({"amountMicros": 5})).await.unwrap();

        let requests = h.transport.json_requests();
        let suffixes: Vec<&str> = requests
            .iter()
            .map(|r| r.url.rsplit('/').next().unwrap_or_default())
            .collect();
        assert_eq!(suffixes, vec![ASSETS, AD_GROUP_ADS, AD_GROUPS, CAMPAIGN_BUDGETS]);
        assert_eq!(requests[0].body, json!({"operations": [{"create": {"name": "logo"}}]}));
    }

    #[tokio::test]
    async fn test_display_campaign_links_budget() {
        let h = harness(
            FakeTransport::new()
                .with_response(200, json!({"results": [{"resourceName": "customers/9711179739/campaignBudgets/555"}]}))
                .with_response(200, json!({"results": [{"resourceName": "customers/9711179739/campaigns/777"}]})),
        );

        let campaign = json!({
            "name": "Display test",
            "status": "PAUSED",
            "advertisingChannelType": "DISPLAY",
            "manualCpc": {},
        });
        let results = h.client.create_display_campaign("971-117-9739", campaign).await.unwrap();
        assert_eq!(results[0]["resourceName"], "customers/9711179739/campaigns/777");

        let requests = h.transport.json_requests();
        assert_eq!(requests.len(), 2);

        let budget = &requests[0].body["operations"][0]["create"];
        assert!(requests[0].url.ends_with(CAMPAIGN_BUDGETS));
        assert_eq!(budget["amountMicros"], 100_000);
        assert_eq!(budget["deliveryMethod"], "STANDARD");
        assert!(budget["name"].as_str().unwrap().starts_with("Campaign Budget: "));

        let created = &requests[1].body["operations"][0]["create"];
        assert!(requests[1].url.ends_with(CAMPAIGNS));
        assert_eq!(created["campaignBudget"], "customers/9711179739/campaignBudgets/555");
        assert_eq!(created["name"], "Display test");
    }

    #[tokio::test]
    async fn test_empty_budget_response_aborts_campaign() {
        let logs = LogCapture::default();
        let _guard = logs.install();
        let h = harness(FakeTransport::new().with_response(200, json!({"results": []})));

        let err = h
            .client
            .create_display_campaign("1", json!({"name": "never sent"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AdsError::MissingResource(ref op) if op == CAMPAIGN_BUDGETS));

        let requests = h.transport.json_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with(CAMPAIGN_BUDGETS));

        let output = logs.contents();
        assert!(output.contains("ERROR"), "{}", output);
        assert!(output.contains("missing_resource"), "{}", output);
        assert!(output.contains(CAMPAIGN_BUDGETS), "{}", output);
    }

    #[tokio::test]
    async fn test_budget_without_resource_name_aborts_campaign() {
        let h = harness(FakeTransport::new().with_response(200, json!({"results": [{"id": "5"}]})));

        let err = h.client.create_display_campaign("1", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), "missing_resource");
        assert_eq!(h.transport.json_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_budget_failure_propagates() {
        let h = harness(FakeTransport::new().with_raw_response(400, "INVALID_ARGUMENT"));

        let err = h.client.create_display_campaign("1", json!({})).await.unwrap_err();
        assert!(matches!(err, AdsError::RemoteApi { status: 400, .. }));
        assert_eq!(h.transport.json_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_non_object_campaign_rejected_up_front() {
        let logs = LogCapture::default();
        let _guard = logs.install();
        let h = harness(FakeTransport::new());

        let err = h.client.create_display_campaign("4242", json!(["nope"])).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
        assert!(h.transport.json_requests().is_empty());

        let output = logs.contents();
        assert!(output.contains("invalid_argument"), "{}", output);
        assert!(output.contains("4242"), "{}", output);
        assert!(output.contains(CAMPAIGNS), "{}", output);
    }
}

//! GAQL query templates used by the listing operations.

use crate::error::{AdsError, AdsResult};

pub const CUSTOMER_CLIENTS: &str = "SELECT
    customer_client.id,
    customer_client.descriptive_name,
    customer_client.manager,
    customer_client.status,
    customer_client.currency_code,
    customer_client.time_zone
FROM customer_client";

pub const CLIENT_ACCOUNTS: &str = "SELECT
    customer_client.id,
    customer_client.descriptive_name,
    customer_client.manager,
    customer_client.status,
    customer_client.currency_code,
    customer_client.time_zone
FROM customer_client
WHERE customer_client.manager = FALSE";

/// Manager accounts carry no metric rows, so only campaign and budget fields.
pub const MANAGER_CAMPAIGNS: &str = "SELECT
    campaign.id,
    campaign.name,
    campaign.status,
    campaign.start_date,
    campaign.end_date,
    campaign.bidding_strategy_type,
    campaign.advertising_channel_type,
    campaign_budget.amount_micros
FROM campaign
ORDER BY campaign.start_date DESC";

pub const CLIENT_CAMPAIGNS: &str = "SELECT
    campaign.id,
    campaign.name,
    campaign.status,
    campaign.start_date,
    campaign.end_date,
    campaign.bidding_strategy_type,
    campaign.advertising_channel_type,
    campaign_budget.amount_micros,
    metrics.impressions,
    metrics.clicks,
    metrics.cost_micros,
    metrics.conversions,
    metrics.ctr,
    metrics.average_cpc
FROM campaign
ORDER BY campaign.start_date DESC";

const AD_GROUPS: &str = "SELECT
    ad_group.id,
    ad_group.name,
    ad_group.status
FROM ad_group";

const ADS: &str = "SELECT
    ad_group_ad.ad.id,
    ad_group_ad.ad.final_urls
FROM ad_group_ad";

pub fn campaigns(is_manager: bool) -> &'static str {
    if is_manager {
        MANAGER_CAMPAIGNS
    } else {
        CLIENT_CAMPAIGNS
    }
}

pub fn ad_groups(campaign_id: Option<&str>) -> AdsResult<String> {
    filtered(AD_GROUPS, "campaign.id", "campaign_id", campaign_id)
}

pub fn ads(ad_group_id: Option<&str>) -> AdsResult<String> {
    filtered(ADS, "ad_group.id", "ad_group_id", ad_group_id)
}

fn filtered(base: &str, field: &str, argument: &str, id: Option<&str>) -> AdsResult<String> {
    let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(base.to_string());
    };

    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdsError::InvalidArgument(format!(
            "{} must be numeric, got {:?}",
            argument, id
        )));
    }

    Ok(format!("{}\nWHERE {} = '{}'", base, field, id))
}

//! Static reference text: the GAQL resource and the guidance prompts.

use crate::protocol::{
    Prompt, PromptMessage, PromptsGetResponse, PromptsListResponse, Resource, ResourceContents,
    ResourcesListResponse, ResourcesReadResponse, ToolContent,
};

pub const GAQL_REFERENCE_URI: &str = "gaql://reference";

const GAQL_REFERENCE: &str = r#"# Google Ads Query Language (GAQL) quick reference

GAQL reads like SQL over Google Ads resources.

## Shape

```
SELECT field1, field2, ...
FROM resource
WHERE condition
ORDER BY field [ASC|DESC]
LIMIT n
```

## Fields

Resource fields:
- campaign.id, campaign.name, campaign.status
- ad_group.id, ad_group.name, ad_group.status
- ad_group_ad.ad.id, ad_group_ad.ad.final_urls
- ad_group_criterion.keyword.text, ad_group_criterion.keyword.match_type

Metrics:
- metrics.impressions, metrics.clicks, metrics.ctr
- metrics.cost_micros, metrics.average_cpc
- metrics.conversions

Segments:
- segments.date, segments.device, segments.day_of_week

## Filters

- WHERE segments.date DURING LAST_7_DAYS
- WHERE segments.date BETWEEN '2025-01-01' AND '2025-01-31'
- WHERE campaign.status = 'ENABLED'
- WHERE metrics.clicks > 100
- WHERE campaign.name LIKE '%Brand%'

## Notes

- Money is in micros: 1,000,000 micros is one unit of the account currency.
- Manager accounts have no metrics; query their client accounts instead.
- Add LIMIT to keep result sets small.
"#;

const WORKFLOW_PROMPT: &str = r#"Here is a reliable order of operations for working with a Google Ads account:

1. Find the accounts you can reach.
   - `is_manager_account(customer_id="ACCOUNT_ID")` tells you whether the id is a manager.
   - For a manager, `list_client_accounts(manager_customer_id="ACCOUNT_ID")` lists its client accounts.

2. Explore a client account.
   - `list_campaigns(customer_id="ACCOUNT_ID")` (includes metrics for client accounts)
   - `list_ad_groups(customer_id="ACCOUNT_ID", campaign_id="CAMPAIGN_ID")`
   - `list_ads(customer_id="ACCOUNT_ID", ad_group_id="AD_GROUP_ID")`

3. Answer anything else with GAQL.
   - `run_gaql(customer_id="ACCOUNT_ID", query="SELECT ...")`
   - Check the account currency (customer.currency_code) before reading cost fields.

4. Make changes only after confirming them with the user.
   - `create_display_campaign` creates a budget and a campaign in one step.
   - `create_campaign_budget`, `create_ad_group`, `create_ad`, `create_image_asset`
   - `run_mutation` for any other `<resource>:mutate` operation.

Always pass customer ids as strings, for example customer_id="1234567890".
"#;

const GAQL_HELP_PROMPT: &str = r#"Some GAQL starting points:

## Campaign performance, last 30 days
```
SELECT
  campaign.id,
  campaign.name,
  campaign.status,
  metrics.impressions,
  metrics.clicks,
  metrics.cost_micros,
  metrics.conversions
FROM campaign
WHERE segments.date DURING LAST_30_DAYS
ORDER BY metrics.cost_micros DESC
```

## Keyword performance
```
SELECT
  ad_group_criterion.keyword.text,
  ad_group_criterion.keyword.match_type,
  metrics.impressions,
  metrics.clicks,
  metrics.conversions
FROM keyword_view
WHERE segments.date DURING LAST_30_DAYS
ORDER BY metrics.clicks DESC
```

## Ads with a low click-through rate
```
SELECT
  ad_group_ad.ad.id,
  campaign.name,
  ad_group.name,
  metrics.impressions,
  metrics.ctr
FROM ad_group_ad
WHERE segments.date DURING LAST_30_DAYS
  AND metrics.impressions > 1000
  AND metrics.ctr < 0.01
ORDER BY metrics.impressions DESC
```

Run a query with `run_gaql(customer_id="ACCOUNT_ID", query="...")`.
Costs are in micros (1,000,000 = one currency unit), and LIMIT keeps results manageable.
"#;

struct PromptEntry {
    name: &'static str,
    description: &'static str,
    text: &'static str,
}

const PROMPTS: &[PromptEntry] = &[
    PromptEntry {
        name: "google_ads_workflow",
        description: "Recommended workflow for exploring and changing a Google Ads account",
        text: WORKFLOW_PROMPT,
    },
    PromptEntry {
        name: "gaql_help",
        description: "Example GAQL queries to adapt",
        text: GAQL_HELP_PROMPT,
    },
];

pub fn list_resources() -> ResourcesListResponse {
    ResourcesListResponse {
        resources: vec![Resource {
            uri: GAQL_REFERENCE_URI.to_string(),
            name: "GAQL reference".to_string(),
            description: "Google Ads Query Language quick reference".to_string(),
            mime_type: "text/markdown".to_string(),
        }],
    }
}

pub fn read_resource(uri: &str) -> Option<ResourcesReadResponse> {
    (uri == GAQL_REFERENCE_URI).then(|| ResourcesReadResponse {
        contents: vec![ResourceContents {
            uri: GAQL_REFERENCE_URI.to_string(),
            mime_type: "text/markdown".to_string(),
            text: GAQL_REFERENCE.to_string(),
        }],
    })
}

pub fn list_prompts() -> PromptsListResponse {
    PromptsListResponse {
        prompts: PROMPTS
            .iter()
            .map(|p| Prompt {
                name: p.name.to_string(),
                description: p.description.to_string(),
            })
            .collect(),
    }
}

pub fn get_prompt(name: &str) -> Option<PromptsGetResponse> {
    let entry = PROMPTS.iter().find(|p| p.name == name)?;
    Some(PromptsGetResponse {
        description: entry.description.to_string(),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ToolContent {
                content_type: "text".to_string(),
                text: entry.text.to_string(),
            },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resource() {
        let read = read_resource(GAQL_REFERENCE_URI).unwrap();
        assert!(read.contents[0].text.contains("micros"));
        assert!(read_resource("gaql://other").is_none());
        assert_eq!(list_resources().resources.len(), 1);
    }

    #[test]
    fn test_prompts() {
        let names: Vec<String> = list_prompts().prompts.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["google_ads_workflow", "gaql_help"]);

        let workflow = get_prompt("google_ads_workflow").unwrap();
        assert!(workflow.messages[0].content.text.contains("list_client_accounts"));
        assert!(get_prompt("missing").is_none());
    }
}

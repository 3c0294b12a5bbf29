use google_ads_api::{AdsClient, AdsError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};

#[derive(Debug)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments(String),
}

#[derive(Clone)]
pub struct ToolRegistry {
    client: AdsClient,
    tools: Vec<McpTool>,
}

impl ToolRegistry {
    pub fn new(client: AdsClient) -> Self {
        Self {
            client,
            tools: tool_definitions(),
        }
    }

    pub fn list_response(&self) -> ToolsListResponse {
        ToolsListResponse {
            tools: self.tools.clone(),
            next_cursor: None,
        }
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolsCallResponse, ToolCallError> {
        if !self.tools.iter().any(|t| t.name == name) {
            warn!(tool = %name, "Unknown tool requested");
            return Err(ToolCallError::UnknownTool(name.to_string()));
        }

        debug!(tool = %name, "Calling tool");
        let client = &self.client;

        let outcome = match name {
            "run_gaql" => {
                let args: QueryArgs = parse(arguments)?;
                client.run_query(&args.customer_id, &args.query).await.map(Value::Array)
            }
            "run_mutation" => {
                let args: MutationArgs = parse(arguments)?;
                client
                    .run_mutation(&args.customer_id, &args.operation, &args.body)
                    .await
                    .map(Value::Array)
            }
            "create_image_asset" => {
                let (customer_id, resource) = resource_args(arguments, "image_asset")?;
                client.create_image_asset(&customer_id, resource).await.map(Value::Array)
            }
            "create_ad" => {
                let (customer_id, resource) = resource_args(arguments, "ad")?;
                client.create_ad(&customer_id, resource).await.map(Value::Array)
            }
            "create_ad_group" => {
                let (customer_id, resource) = resource_args(arguments, "ad_group")?;
                client.create_ad_group(&customer_id, resource).await.map(Value::Array)
            }
            "create_campaign_budget" => {
                let (customer_id, resource) = resource_args(arguments, "campaign_budget")?;
                client.create_campaign_budget(&customer_id, resource).await.map(Value::Array)
            }
            "create_display_campaign" => {
                let (customer_id, resource) = resource_args(arguments, "campaign")?;
                client.create_display_campaign(&customer_id, resource).await.map(Value::Array)
            }
            "is_manager_account" => {
                let args: CustomerArgs = parse(arguments)?;
                client.is_manager_account(&args.customer_id).await.map(Value::Bool)
            }
            "list_client_accounts" => {
                let args: ManagerArgs = parse(arguments)?;
                client.list_client_accounts(&args.manager_customer_id).await.map(Value::Array)
            }
            "list_campaigns" => {
                let args: CustomerArgs = parse(arguments)?;
                client.list_campaigns(&args.customer_id).await.map(Value::Array)
            }
            "list_ad_groups" => {
                let args: AdGroupsArgs = parse(arguments)?;
                client
                    .list_ad_groups(&args.customer_id, args.campaign_id.as_deref())
                    .await
                    .map(Value::Array)
            }
            "list_ads" => {
                let args: AdsArgs = parse(arguments)?;
                client
                    .list_ads(&args.customer_id, args.ad_group_id.as_deref())
                    .await
                    .map(Value::Array)
            }
            _ => return Err(ToolCallError::UnknownTool(name.to_string())),
        };

        Ok(match outcome {
            Ok(value) => ToolsCallResponse::json(&value),
            Err(e) => ToolsCallResponse::error(&error_body(&e)),
        })
    }
}

fn error_body(err: &AdsError) -> Value {
    json!({ "error": { "kind": err.kind(), "message": err.to_string() } })
}

// ── Arguments ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CustomerArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
}

#[derive(Debug, Deserialize)]
struct ManagerArgs {
    #[serde(deserialize_with = "id_string")]
    manager_customer_id: String,
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
    #[serde(alias = "gaql")]
    query: String,
}

#[derive(Debug, Deserialize)]
struct MutationArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
    operation: String,
    body: Value,
}

#[derive(Debug, Deserialize)]
struct AdGroupsArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    campaign_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdsArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    ad_group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceArgs {
    #[serde(deserialize_with = "id_string")]
    customer_id: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Ids are accepted as strings or bare integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn optional_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolCallError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments(e.to_string()))
}

/// Split `{customer_id, <key>: {...}}` into the id and the resource object.
fn resource_args(arguments: Value, key: &str) -> Result<(String, Value), ToolCallError> {
    let mut args: ResourceArgs = parse(arguments)?;
    match args.rest.remove(key) {
        Some(resource @ Value::Object(_)) => Ok((args.customer_id, resource)),
        Some(_) => Err(ToolCallError::InvalidArguments(format!("{} must be an object", key))),
        None => Err(ToolCallError::InvalidArguments(format!("missing field `{}`", key))),
    }
}

// ── Definitions ─────────────────────────────────────────────────────────────

fn customer_id_schema() -> Value {
    json!({
        "type": "string",
        "description": "Google Ads customer id, e.g. 123-456-7890 or 1234567890"
    })
}

fn read_only() -> Option<ToolAnnotations> {
    Some(ToolAnnotations {
        read_only_hint: Some(true),
        destructive_hint: None,
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    })
}

fn creates() -> Option<ToolAnnotations> {
    Some(ToolAnnotations {
        read_only_hint: Some(false),
        destructive_hint: Some(false),
        idempotent_hint: Some(false),
        open_world_hint: Some(true),
    })
}

fn tool(name: &str, description: &str, input_schema: Value, annotations: Option<ToolAnnotations>) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
        annotations,
    }
}

fn create_tool(name: &str, description: &str, key: &str, example: Value) -> McpTool {
    tool(
        name,
        description,
        json!({
            "type": "object",
            "properties": {
                "customer_id": customer_id_schema(),
                key: {
                    "type": "object",
                    "description": format!("Resource to create, in REST (camelCase) form, e.g. {}", example)
                }
            },
            "required": ["customer_id", key]
        }),
        creates(),
    )
}

fn tool_definitions() -> Vec<McpTool> {
    vec![
        tool(
            "run_gaql",
            "Run a Google Ads Query Language (GAQL) query and return the result rows.",
            json!({
                "type": "object",
                "properties": {
                    "customer_id": customer_id_schema(),
                    "query": { "type": "string", "description": "GAQL query" }
                },
                "required": ["customer_id", "query"]
            }),
            read_only(),
        ),
        tool(
            "run_mutation",
            "POST an operations body to customers/{customer_id}/{operation}, e.g. operation \"campaigns:mutate\".",
            json!({
                "type": "object",
                "properties": {
                    "customer_id": customer_id_schema(),
                    "operation": { "type": "string", "description": "API operation, e.g. campaignBudgets:mutate" },
                    "body": { "type": "object", "description": "Request body, e.g. {\"operations\": [{\"create\": {...}}]}" }
                },
                "required": ["customer_id", "operation", "body"]
            }),
            Some(ToolAnnotations {
                read_only_hint: Some(false),
                destructive_hint: Some(true),
                idempotent_hint: Some(false),
                open_world_hint: Some(true),
            }),
        ),
        create_tool(
            "create_image_asset",
            "Create an image asset.",
            "image_asset",
            json!({"name": "Logo", "type": "IMAGE", "imageAsset": {"data": "<base64>"}}),
        ),
        create_tool(
            "create_ad",
            "Create an ad group ad.",
            "ad",
            json!({"adGroup": "customers/1234567890/adGroups/111", "status": "PAUSED", "ad": {}}),
        ),
        create_tool(
            "create_ad_group",
            "Create an ad group.",
            "ad_group",
            json!({"name": "Ad group", "campaign": "customers/1234567890/campaigns/222", "status": "ENABLED", "type": "DISPLAY_STANDARD", "cpcBidMicros": 100000}),
        ),
        create_tool(
            "create_campaign_budget",
            "Create a campaign budget. Amounts are in micros.",
            "campaign_budget",
            json!({"name": "Budget", "amountMicros": 100000, "deliveryMethod": "STANDARD"}),
        ),
        create_tool(
            "create_display_campaign",
            "Create a campaign. A new budget is created first and linked through campaignBudget.",
            "campaign",
            json!({"name": "Display campaign", "status": "PAUSED", "advertisingChannelType": "DISPLAY", "manualCpc": {}}),
        ),
        tool(
            "is_manager_account",
            "Check whether a customer account is a manager account.",
            json!({
                "type": "object",
                "properties": { "customer_id": customer_id_schema() },
                "required": ["customer_id"]
            }),
            read_only(),
        ),
        tool(
            "list_client_accounts",
            "List the client (non-manager) accounts under a manager account.",
            json!({
                "type": "object",
                "properties": { "manager_customer_id": customer_id_schema() },
                "required": ["manager_customer_id"]
            }),
            read_only(),
        ),
        tool(
            "list_campaigns",
            "List campaigns. Performance metrics are included for client accounts only.",
            json!({
                "type": "object",
                "properties": { "customer_id": customer_id_schema() },
                "required": ["customer_id"]
            }),
            read_only(),
        ),
        tool(
            "list_ad_groups",
            "List ad groups, optionally filtered by campaign id.",
            json!({
                "type": "object",
                "properties": {
                    "customer_id": customer_id_schema(),
                    "campaign_id": { "type": "string", "description": "Optional campaign id" }
                },
                "required": ["customer_id"]
            }),
            read_only(),
        ),
        tool(
            "list_ads",
            "List ads, optionally filtered by ad group id.",
            json!({
                "type": "object",
                "properties": {
                    "customer_id": customer_id_schema(),
                    "ad_group_id": { "type": "string", "description": "Optional ad group id" }
                },
                "required": ["customer_id"]
            }),
            read_only(),
        ),
    ]
}

use tracing::info;

use crate::protocol::{
    InitializeRequest, InitializeResponse, ListChangedCapability, ResourcesCapabilities, ServerCapabilities,
    ServerInfo, MCP_PROTOCOL_VERSION,
};

pub fn handle_initialize(request: InitializeRequest) -> InitializeResponse {
    info!(
        client_name = %request.client_info.name,
        client_version = %request.client_info.version,
        protocol_version = %request.protocol_version,
        "Client initializing"
    );

    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ListChangedCapability { list_changed: false },
            resources: ResourcesCapabilities {
                subscribe: false,
                list_changed: false,
            },
            prompts: ListChangedCapability { list_changed: false },
        },
        server_info: ServerInfo {
            name: "google-ads-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: "Google Ads tools. Pass customer ids as strings (hyphens are fine). Call is_manager_account or list_client_accounts before querying metrics, and confirm with the user before calling any create_* or run_mutation tool.".to_string(),
    }
}

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::initialize;
use crate::protocol::{
    error, methods, success, InitializeRequest, JsonRpcRequest, JsonRpcResponse, PromptsGetRequest,
    ResourcesReadRequest, ToolsCallRequest, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::resources;
use crate::tools::{ToolCallError, ToolRegistry};

/// Serve line-delimited JSON-RPC until `reader` reaches EOF.
pub async fn serve<R, W>(registry: &ToolRegistry, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(request = %trimmed, "Received request");
        let Some(response) = handle_message(registry, trimmed).await else {
            continue;
        };

        let payload = serde_json::to_string(&response)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle one JSON-RPC message. Notifications produce no response.
pub async fn handle_message(registry: &ToolRegistry, input: &str) -> Option<JsonRpcResponse> {
    let request = match serde_json::from_str::<JsonRpcRequest>(input) {
        Ok(req) => req,
        Err(e) => return Some(error(Value::Null, PARSE_ERROR, format!("parse error: {}", e), None)),
    };

    let Some(id) = request.id.clone() else {
        if request.method == methods::INITIALIZED {
            info!("Client finished initialization");
        } else {
            debug!(method = %request.method, "Notification received");
        }
        return None;
    };

    if request.jsonrpc != "2.0" {
        return Some(error(id, INVALID_REQUEST, "invalid JSON-RPC version, expected 2.0", None));
    }

    let response = match request.method.as_str() {
        methods::INITIALIZE => match serde_json::from_value::<InitializeRequest>(request.params) {
            Ok(init) => respond(id, initialize::handle_initialize(init)),
            Err(e) => error(id, INVALID_PARAMS, format!("invalid initialize params: {}", e), None),
        },
        methods::PING => success(id, serde_json::json!({})),
        methods::TOOLS_LIST => respond(id, registry.list_response()),
        methods::TOOLS_CALL => match serde_json::from_value::<ToolsCallRequest>(request.params) {
            Ok(call) => match registry.call_tool(&call.name, call.arguments).await {
                Ok(result) => respond(id, result),
                Err(ToolCallError::UnknownTool(name)) => {
                    error(id, METHOD_NOT_FOUND, format!("unknown tool: {}", name), None)
                }
                Err(ToolCallError::InvalidArguments(msg)) => {
                    error(id, INVALID_PARAMS, format!("invalid arguments for {}: {}", call.name, msg), None)
                }
            },
            Err(e) => error(id, INVALID_PARAMS, format!("invalid tools/call params: {}", e), None),
        },
        methods::RESOURCES_LIST => respond(id, resources::list_resources()),
        methods::RESOURCES_READ => match serde_json::from_value::<ResourcesReadRequest>(request.params) {
            Ok(read) => match resources::read_resource(&read.uri) {
                Some(result) => respond(id, result),
                None => error(id, INVALID_PARAMS, format!("unknown resource: {}", read.uri), None),
            },
            Err(e) => error(id, INVALID_PARAMS, format!("invalid resources/read params: {}", e), None),
        },
        methods::PROMPTS_LIST => respond(id, resources::list_prompts()),
        methods::PROMPTS_GET => match serde_json::from_value::<PromptsGetRequest>(request.params) {
            Ok(get) => match resources::get_prompt(&get.name) {
                Some(result) => respond(id, result),
                None => error(id, INVALID_PARAMS, format!("unknown prompt: {}", get.name), None),
            },
            Err(e) => error(id, INVALID_PARAMS, format!("invalid prompts/get params: {}", e), None),
        },
        _ => {
            warn!(method = %request.method, "Unknown method");
            error(id, METHOD_NOT_FOUND, format!("method not found: {}", request.method), None)
        }
    };

    Some(response)
}

fn respond<T: serde::Serialize>(id: Value, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => success(id, value),
        Err(e) => error(id, INTERNAL_ERROR, format!("failed to serialize result: {}", e), None),
    }
}

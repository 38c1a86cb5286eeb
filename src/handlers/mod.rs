pub mod prompts;
pub mod tools;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::protocol::{
    GetPromptParams, InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ToolCallParams,
};
use crate::server::ServerState;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "binkai-server";

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required). Every request
/// with an id resolves to exactly one success or one error.
pub async fn dispatch(req: &JsonRpcRequest, state: &ServerState) -> Option<JsonRpcResponse> {
    if req.id.is_none() {
        debug!(method = %req.method, "notification ignored");
        return None;
    }

    match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .clone()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok())
            {
                let client = params.client_info.as_ref();
                info!(
                    protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
                    "client connected"
                );
            }
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            tools::list(&state.agent),
        )),

        "tools/call" => {
            let params: ToolCallParams = match parse_params(req) {
                Ok(p) => p,
                Err(e) => return Some(JsonRpcResponse::error(req.id.clone(), e)),
            };
            let tool_result = tools::call(params, &state.agent).await;
            Some(JsonRpcResponse::from_serializable(req.id.clone(), &tool_result))
        }

        "prompts/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            prompts::list(&state.prompts),
        )),

        "prompts/get" => {
            let params: GetPromptParams = match parse_params(req) {
                Ok(p) => p,
                Err(e) => return Some(JsonRpcResponse::error(req.id.clone(), e)),
            };
            match prompts::get(&params, &state.prompts) {
                Ok(result) => Some(JsonRpcResponse::from_serializable(req.id.clone(), &result)),
                Err(e) => Some(JsonRpcResponse::error(req.id.clone(), e)),
            }
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

fn parse_params<T: DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, JsonRpcError> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcError::invalid_params(format!("Invalid {} params: {e}", req.method))
        }),
        None => Err(JsonRpcError::invalid_params(format!(
            "Missing params for {}",
            req.method
        ))),
    }
}

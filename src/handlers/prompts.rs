use serde_json::{json, Value};
use tracing::debug;

use crate::prompts::PromptRegistry;
use crate::protocol::{GetPromptParams, GetPromptResult, JsonRpcError, McpErrorResponse};

/// Handle `prompts/list`.
pub fn list(registry: &PromptRegistry) -> Value {
    json!({ "prompts": registry.list() })
}

/// Handle `prompts/get`.
///
/// Unknown names and bad arguments are both JSON-RPC invalid-params errors;
/// `data.error.code` (`prompt_not_found` / `invalid_params`) tells them apart.
pub fn get(params: &GetPromptParams, registry: &PromptRegistry) -> Result<GetPromptResult, JsonRpcError> {
    registry
        .render(&params.name, params.arguments.as_ref())
        .map_err(|e| {
            debug!(prompt = %params.name, error = %e, "prompt rejected");
            McpErrorResponse::new(e.code(), e.to_string()).into()
        })
}

use serde_json::{json, Value};
use tracing::warn;

use crate::agent::{Agent, ToolOutput};
use crate::protocol::{ToolCallParams, ToolResult};

/// Handle `tools/list`.
pub fn list(agent: &Agent) -> Value {
    json!({ "tools": agent.list_tools() })
}

/// Handle a `tools/call`.
///
/// Never fails at the JSON-RPC level: lookup, validation and plugin errors
/// all come back as an `isError` result of the form `<tool> error: <message>`.
pub async fn call(params: ToolCallParams, agent: &Agent) -> ToolResult {
    match agent.invoke_tool(&params.name, params.arguments).await {
        Ok(output) => render_output(output),
        Err(e) => {
            warn!(tool = %params.name, code = ?e.code(), error = %e, "tool call failed");
            ToolResult::error(format!("{} error: {e}", params.name))
        }
    }
}

/// Shape raw plugin output into a content block.
///
/// Text that parses as JSON is re-emitted pretty-printed (2-space indent)
/// as `application/json`; any other text passes through as `text/plain`.
pub fn render_output(output: ToolOutput) -> ToolResult {
    match output {
        ToolOutput::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => ToolResult::json(pretty),
                Err(_) => ToolResult::plain(text),
            },
            Err(_) => ToolResult::plain(text),
        },
        ToolOutput::Json(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => ToolResult::json(pretty),
            Err(e) => ToolResult::error(format!("failed to encode tool output: {e}")),
        },
    }
}

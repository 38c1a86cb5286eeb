use serde::{Deserialize, Serialize};
use serde_json::json;

use super::request::RpcId;

/// MIME type tagged on tool output that parsed as JSON.
pub const MIME_JSON: &str = "application/json";
/// MIME type tagged on plain-text tool output and error text.
pub const MIME_TEXT: &str = "text/plain";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Serialize `result` into a success envelope, falling back to an
    /// internal error if it cannot be represented as JSON.
    pub fn from_serializable<T: Serialize>(id: Option<RpcId>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => {
                tracing::error!(error = %e, "result serialization failed");
                Self::error(id, McpErrorResponse::canonical(McpErrorCode::InternalError).into())
            }
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self { code: -32600, message: detail.into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

impl ToolResult {
    fn block(mime_type: &str, text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                mime_type: mime_type.into(),
                text,
            }],
            is_error,
        }
    }

    /// Structured output, already pretty-printed.
    pub fn json(text: impl Into<String>) -> Self {
        Self::block(MIME_JSON, text.into(), false)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::block(MIME_TEXT, text.into(), false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::block(MIME_TEXT, text.into(), true)
    }
}

// ---------------------------------------------------------------------------
// MCP prompt layer
// ---------------------------------------------------------------------------

/// Prompt argument metadata advertised by `prompts/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

/// One entry of a `prompts/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct PromptInfo {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// A conversational message produced by a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: TextContent,
}

impl PromptMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TextContent {
                content_type: "text".into(),
                text: text.into(),
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetPromptResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

// ---------------------------------------------------------------------------
// MCP domain-level error types
// ---------------------------------------------------------------------------

/// MCP error code carried in `error.data` so clients can tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpErrorCode {
    PromptNotFound,
    ToolNotFound,
    InvalidParams,
    UnsupportedOperation,
    UpstreamFailure,
    InternalError,
}

impl McpErrorCode {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Caller mistakes (wrong name or wrong shape) → -32602 (Invalid params)
    /// Server-side failures                       → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::PromptNotFound | Self::ToolNotFound | Self::InvalidParams => -32602,
            Self::UnsupportedOperation | Self::UpstreamFailure | Self::InternalError => -32603,
        }
    }
}

/// MCP error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpError {
    pub code: McpErrorCode,
    pub message: String,
}

/// MCP error response (top-level)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpErrorResponse {
    pub error: McpError,
}

impl McpErrorResponse {
    pub fn new(code: McpErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: McpError {
                code,
                message: message.into(),
            },
        }
    }

    /// Construct with the canonical message for a given code.
    pub fn canonical(code: McpErrorCode) -> Self {
        let message = match &code {
            McpErrorCode::PromptNotFound => "Prompt not found",
            McpErrorCode::ToolNotFound => "Tool not found",
            McpErrorCode::InvalidParams => "Invalid params",
            McpErrorCode::UnsupportedOperation => "Unsupported operation",
            McpErrorCode::UpstreamFailure => "Upstream provider failure",
            McpErrorCode::InternalError => "Internal error",
        };
        Self::new(code, message)
    }
}

/// Convert an MCP domain error into a JSON-RPC error.
///
/// The JSON-RPC `code` is derived from the MCP error code.
/// The JSON-RPC `message` is the human-readable MCP message.
/// The full MCP error object is carried in `data` for structured clients.
impl From<McpErrorResponse> for JsonRpcError {
    fn from(mcp: McpErrorResponse) -> Self {
        let data = json!({
            "error": {
                "code": mcp.error.code,
                "message": mcp.error.message,
            }
        });
        Self {
            code: mcp.error.code.json_rpc_code(),
            message: mcp.error.message,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_data_carries_snake_case_code() {
        let err: JsonRpcError =
            McpErrorResponse::new(McpErrorCode::PromptNotFound, "Prompt nope not found").into();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "Prompt nope not found");
        let data = err.data.unwrap();
        assert_eq!(data["error"]["code"], "prompt_not_found");
        assert_eq!(data["error"]["message"], "Prompt nope not found");
    }

    #[test]
    fn tool_result_omits_is_error_on_success() {
        let ok = serde_json::to_value(ToolResult::plain("hi")).unwrap();
        assert!(ok.get("isError").is_none());
        assert_eq!(ok["content"][0]["mimeType"], MIME_TEXT);

        let failed = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(failed["isError"], true);
    }

    #[test]
    fn response_keeps_null_id() {
        let resp = JsonRpcResponse::error(None, JsonRpcError::parse_error());
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["error"]["code"], -32700);
    }
}

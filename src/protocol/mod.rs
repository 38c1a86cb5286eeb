pub mod request;
pub mod response;

pub use request::{
    ClientInfo, GetPromptParams, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams,
};
pub use response::{
    GetPromptResult, JsonRpcError, JsonRpcResponse, McpError, McpErrorCode, McpErrorResponse,
    PromptArgument, PromptInfo, PromptMessage, Role, TextContent, ToolResult, ToolResultContent,
    MIME_JSON, MIME_TEXT,
};

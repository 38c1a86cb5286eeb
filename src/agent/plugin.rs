use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Raw result of a tool execution, passed through the facade unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

/// Failure reported by a plugin or the provider behind it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginError {
    #[error("{0}")]
    Failed(String),
    #[error("tool `{0}` is not provided by this plugin")]
    UnknownTool(String),
    #[error("setup failed: {0}")]
    Setup(String),
}

impl PluginError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A capability plugin contributing one or more tools.
///
/// Swap, bridge, staking, token and wallet integrations all live behind this
/// trait; the facade only knows their names, tools and execution entry point.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// One-time async setup, awaited before the plugin's tools are read.
    async fn initialize(&self) -> Result<(), PluginError> {
        Ok(())
    }

    fn tools(&self) -> Vec<ToolDescriptor>;

    async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput, PluginError>;
}

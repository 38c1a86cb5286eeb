//! Agent facade: the tool table, the registered plugins, and the wallet and
//! network context they run against.

pub mod network;
pub mod plugin;
pub mod wallet;

use std::collections::BTreeMap;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::protocol::McpErrorCode;
use crate::schema::{compile_json_schema, json_violations, SchemaError};

pub use network::{NativeCurrency, NetworkConfig, NetworkType, Networks};
pub use plugin::{Plugin, PluginError, ToolDescriptor, ToolOutput};
pub use wallet::Wallet;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("unsupported operation: tool `{0}` is not registered")]
    ToolNotFound(String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("invalid arguments: {}", .violations.join("; "))]
    InvalidArguments { tool: String, violations: Vec<String> },
    #[error("plugin `{plugin}` failed to initialize: {source}")]
    Setup {
        plugin: String,
        #[source]
        source: PluginError,
    },
    #[error("tool `{tool}` declares an invalid input schema: {source}")]
    Schema {
        tool: String,
        #[source]
        source: SchemaError,
    },
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl AgentError {
    pub fn code(&self) -> McpErrorCode {
        match self {
            Self::ToolNotFound(_) => McpErrorCode::ToolNotFound,
            Self::Unsupported(_) => McpErrorCode::UnsupportedOperation,
            Self::InvalidArguments { .. } => McpErrorCode::InvalidParams,
            Self::Plugin(_) => McpErrorCode::UpstreamFailure,
            Self::Setup { .. } | Self::Schema { .. } => McpErrorCode::InternalError,
        }
    }
}

/// Storage backend a plugin host could persist conversations into.
/// The facade does not support one.
pub trait DatabaseAdapter: Send + Sync {}

struct ToolEntry {
    descriptor: ToolDescriptor,
    plugin: String,
    validator: Validator,
}

/// Exposes tool discovery and invocation over a set of registered plugins.
///
/// Plugins are registered before the server starts; afterwards the tables are
/// only read.
pub struct Agent {
    wallet: Wallet,
    networks: Networks,
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
    tools: BTreeMap<String, ToolEntry>,
}

impl Agent {
    pub fn new(wallet: Wallet, networks: Networks) -> Self {
        Self {
            wallet,
            networks,
            plugins: BTreeMap::new(),
            tools: BTreeMap::new(),
        }
    }

    /// Initialize `plugin` and merge its tools into the tool table.
    ///
    /// Re-registering a plugin name replaces the previous instance and drops
    /// every tool it contributed. A tool name already owned by another plugin
    /// is taken over by this one. On error the tables are left untouched.
    pub async fn register_plugin(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), AgentError> {
        let name = plugin.name().to_string();
        plugin.initialize().await.map_err(|source| AgentError::Setup {
            plugin: name.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for descriptor in plugin.tools() {
            let validator = compile_json_schema(&descriptor.input_schema).map_err(|source| {
                AgentError::Schema {
                    tool: descriptor.name.clone(),
                    source,
                }
            })?;
            entries.push(ToolEntry {
                descriptor,
                plugin: name.clone(),
                validator,
            });
        }

        if self.plugins.insert(name.clone(), plugin).is_some() {
            warn!(plugin = %name, "plugin re-registered; replacing previous instance");
            self.tools.retain(|_, entry| entry.plugin != name);
        }

        for entry in entries {
            let tool = entry.descriptor.name.clone();
            if let Some(previous) = self.tools.insert(tool.clone(), entry) {
                warn!(tool = %tool, previous = %previous.plugin, plugin = %name, "tool name taken over");
            }
        }

        debug!(plugin = %name, tools = self.tools.len(), "plugin registered");
        Ok(())
    }

    /// Snapshot of the tool table, ordered by tool name.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Validate `args` against the tool's input schema and delegate to the
    /// owning plugin. The plugin's output is returned unchanged.
    ///
    /// The plugin runs on its own task, so a panic inside it surfaces as an
    /// upstream failure instead of unwinding through the transport.
    pub async fn invoke_tool(&self, name: &str, args: Option<Value>) -> Result<ToolOutput, AgentError> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        let plugin = self
            .plugins
            .get(&entry.plugin)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        let args = match args {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(v) => v,
        };

        let violations = json_violations(&entry.validator, &args);
        if !violations.is_empty() {
            return Err(AgentError::InvalidArguments {
                tool: name.to_string(),
                violations,
            });
        }

        debug!(tool = name, plugin = %entry.plugin, "invoking tool");
        let plugin = Arc::clone(plugin);
        let tool = name.to_string();
        let task = tokio::spawn(async move { plugin.execute(&tool, args).await });
        match task.await {
            Ok(result) => Ok(result?),
            Err(e) if e.is_panic() => {
                error!(tool = name, plugin = %entry.plugin, "plugin panicked");
                Err(PluginError::failed("plugin panicked").into())
            }
            Err(e) => {
                error!(tool = name, plugin = %entry.plugin, error = %e, "plugin task cancelled");
                Err(PluginError::failed("plugin task cancelled").into())
            }
        }
    }

    /// Always fails: this facade has no persistence.
    pub async fn register_database(&self, _adapter: Arc<dyn DatabaseAdapter>) -> Result<(), AgentError> {
        Err(AgentError::Unsupported("database registration"))
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn networks(&self) -> &Networks {
        &self.networks
    }

    /// Registered plugin names, ordered.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    /// Name of the plugin that owns `tool`.
    pub fn owner_of(&self, tool: &str) -> Option<&str> {
        self.tools.get(tool).map(|entry| entry.plugin.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::json;

    struct Echo {
        name: &'static str,
        tools: &'static [&'static str],
    }

    #[async_trait]
    impl Plugin for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn tools(&self) -> Vec<ToolDescriptor> {
            self.tools
                .iter()
                .map(|t| {
                    ToolDescriptor::new(
                        *t,
                        format!("{t} from {}", self.name),
                        json!({"type": "object", "properties": {}}),
                    )
                })
                .collect()
        }

        async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput, PluginError> {
            Ok(ToolOutput::Json(json!({"plugin": self.name, "tool": tool, "args": args})))
        }
    }

    struct FailingSetup;

    #[async_trait]
    impl Plugin for FailingSetup {
        fn name(&self) -> &str {
            "broken"
        }

        async fn initialize(&self) -> Result<(), PluginError> {
            Err(PluginError::Setup("provider unreachable".into()))
        }

        fn tools(&self) -> Vec<ToolDescriptor> {
            Vec::new()
        }

        async fn execute(&self, tool: &str, _args: Value) -> Result<ToolOutput, PluginError> {
            Err(PluginError::UnknownTool(tool.into()))
        }
    }

    fn agent() -> Agent {
        let wallet = Wallet::new(SecretString::new(wallet::DEFAULT_MNEMONIC.into()), 0);
        Agent::new(wallet, Networks::mainnet_defaults())
    }

    #[tokio::test]
    async fn every_listed_tool_is_invocable() {
        let mut agent = agent();
        agent
            .register_plugin(Arc::new(Echo { name: "swap", tools: &["swap", "quote"] }))
            .await
            .unwrap();
        agent
            .register_plugin(Arc::new(Echo { name: "bridge", tools: &["bridge"] }))
            .await
            .unwrap();

        let tools = agent.list_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["bridge", "quote", "swap"]);

        for tool in &tools {
            let out = agent.invoke_tool(&tool.name, None).await.unwrap();
            let ToolOutput::Json(value) = out else {
                panic!("expected json output");
            };
            assert_eq!(value["tool"], tool.name.as_str());
            assert_eq!(value["args"], json!({}));
        }
    }

    #[tokio::test]
    async fn unregistered_tool_fails_deterministically() {
        let agent = agent();
        let err = agent.invoke_tool("does-not-exist", None).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(ref n) if n == "does-not-exist"));
        assert_eq!(err.code(), McpErrorCode::ToolNotFound);
    }

    #[tokio::test]
    async fn reregistration_replaces_plugin_and_its_tools() {
        let mut agent = agent();
        agent
            .register_plugin(Arc::new(Echo { name: "token", tools: &["old_lookup", "price"] }))
            .await
            .unwrap();
        agent
            .register_plugin(Arc::new(Echo { name: "token", tools: &["price"] }))
            .await
            .unwrap();

        assert_eq!(agent.plugin_names(), vec!["token"]);
        let names: Vec<String> = agent.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["price".to_string()]);
        assert!(agent.invoke_tool("old_lookup", None).await.is_err());
    }

    #[tokio::test]
    async fn colliding_tool_name_is_last_write_wins() {
        let mut agent = agent();
        agent
            .register_plugin(Arc::new(Echo { name: "a", tools: &["balance"] }))
            .await
            .unwrap();
        agent
            .register_plugin(Arc::new(Echo { name: "b", tools: &["balance"] }))
            .await
            .unwrap();
        assert_eq!(agent.owner_of("balance"), Some("b"));
        assert_eq!(agent.list_tools().len(), 1);
    }

    #[tokio::test]
    async fn failed_setup_leaves_tables_untouched() {
        let mut agent = agent();
        let err = agent.register_plugin(Arc::new(FailingSetup)).await.unwrap_err();
        assert!(err.to_string().contains("provider unreachable"));
        assert!(agent.plugin_names().is_empty());
    }

    #[tokio::test]
    async fn database_registration_is_unsupported() {
        struct Memory;
        impl DatabaseAdapter for Memory {}

        let agent = agent();
        let err = agent.register_database(Arc::new(Memory)).await.unwrap_err();
        assert_eq!(err.code(), McpErrorCode::UnsupportedOperation);
    }

    #[tokio::test]
    async fn exposes_read_only_context() {
        let agent = agent();
        assert_eq!(agent.wallet().index(), 0);
        assert_eq!(agent.networks().len(), 3);
    }
}

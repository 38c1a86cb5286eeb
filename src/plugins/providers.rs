use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::agent::{Plugin, PluginError, ToolDescriptor, ToolOutput};
use crate::config::ServerConfig;

pub const LIST_PROVIDERS: &str = "list_providers";

/// A data provider and whether this process can use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub capabilities: &'static [&'static str],
    pub networks: &'static [&'static str],
}

/// Reports which optional data providers are configured. Keys are never echoed.
pub struct ProviderStatusPlugin {
    providers: Vec<ProviderStatus>,
}

impl ProviderStatusPlugin {
    pub fn new(providers: Vec<ProviderStatus>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(vec![
            ProviderStatus {
                name: "rpc",
                enabled: true,
                capabilities: &["wallet"],
                networks: &["bnb"],
            },
            ProviderStatus {
                name: "birdeye",
                enabled: config.birdeye_api_key.is_some(),
                capabilities: &["wallet"],
                networks: &["bnb", "solana"],
            },
            ProviderStatus {
                name: "alchemy",
                enabled: config.alchemy_api_key.is_some(),
                capabilities: &["wallet", "token"],
                networks: &["bnb", "ethereum", "solana"],
            },
        ])
    }

    pub fn providers(&self) -> &[ProviderStatus] {
        &self.providers
    }
}

#[async_trait]
impl Plugin for ProviderStatusPlugin {
    fn name(&self) -> &str {
        "providers"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![ToolDescriptor::new(
            LIST_PROVIDERS,
            "List data providers backing wallet and token lookups and whether each is enabled",
            json!({
                "type": "object",
                "properties": {
                    "enabled_only": {
                        "type": "boolean",
                        "description": "Only list providers that are enabled"
                    }
                }
            }),
        )]
    }

    async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput, PluginError> {
        if tool != LIST_PROVIDERS {
            return Err(PluginError::UnknownTool(tool.to_string()));
        }
        let enabled_only = args
            .get("enabled_only")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let listed: Vec<&ProviderStatus> = self
            .providers
            .iter()
            .filter(|p| p.enabled || !enabled_only)
            .collect();
        // The router pretty-prints JSON text.
        serde_json::to_string(&json!({ "providers": listed }))
            .map(ToolOutput::Text)
            .map_err(|e| PluginError::failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(alchemy: Option<&str>) -> ServerConfig {
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.alchemy_api_key = alchemy.map(|k| SecretString::new(k.into()));
        config
    }

    #[test]
    fn missing_keys_disable_providers() {
        let plugin = ProviderStatusPlugin::from_config(&config(None));
        let enabled: Vec<&str> = plugin
            .providers()
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.name)
            .collect();
        assert_eq!(enabled, vec!["rpc"]);
    }

    #[tokio::test]
    async fn enabled_only_filters_and_hides_keys() {
        let plugin = ProviderStatusPlugin::from_config(&config(Some("alchemy-key")));
        let out = plugin
            .execute(LIST_PROVIDERS, json!({"enabled_only": true}))
            .await
            .unwrap();
        let ToolOutput::Text(text) = out else {
            panic!("expected text output");
        };
        assert!(!text.contains("alchemy-key"));
        let value: Value = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = value["providers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["rpc", "alchemy"]);
    }
}

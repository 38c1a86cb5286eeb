use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::{Networks, Plugin, PluginError, ToolDescriptor, ToolOutput};

pub const LIST_NETWORKS: &str = "list_networks";
pub const GET_NETWORK: &str = "get_network";

/// Read-only view of the configured networks.
pub struct NetworkPlugin {
    networks: Networks,
}

impl NetworkPlugin {
    pub fn new(networks: Networks) -> Self {
        Self { networks }
    }
}

#[async_trait]
impl Plugin for NetworkPlugin {
    fn name(&self) -> &str {
        "network"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new(
                LIST_NETWORKS,
                "List the networks this agent can operate on, with RPC endpoint, chain id and native currency",
                json!({ "type": "object", "properties": {} }),
            ),
            ToolDescriptor::new(
                GET_NETWORK,
                "Get the configuration of a single network",
                json!({
                    "type": "object",
                    "required": ["network"],
                    "properties": {
                        "network": {
                            "type": "string",
                            "description": "Network identifier",
                            "enum": self.networks.ids()
                        }
                    }
                }),
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput, PluginError> {
        match tool {
            LIST_NETWORKS => serde_json::to_value(&self.networks)
                .map(ToolOutput::Json)
                .map_err(|e| PluginError::failed(e.to_string())),
            GET_NETWORK => {
                let id = args
                    .get("network")
                    .and_then(Value::as_str)
                    .ok_or_else(|| PluginError::failed("network is required"))?;
                let config = self
                    .networks
                    .get(id)
                    .ok_or_else(|| PluginError::failed(format!("network {id} is not configured")))?;
                serde_json::to_value(config)
                    .map(|value| ToolOutput::Json(json!({ "id": id, "config": value })))
                    .map_err(|e| PluginError::failed(e.to_string()))
            }
            other => Err(PluginError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_network_returns_single_config() {
        let plugin = NetworkPlugin::new(Networks::mainnet_defaults());
        let out = plugin
            .execute(GET_NETWORK, json!({"network": "ethereum"}))
            .await
            .unwrap();
        let ToolOutput::Json(value) = out else {
            panic!("expected json");
        };
        assert_eq!(value["id"], "ethereum");
        assert_eq!(value["config"]["chainId"], 1);
    }

    #[tokio::test]
    async fn schema_enumerates_configured_ids() {
        let plugin = NetworkPlugin::new(Networks::mainnet_defaults());
        let tools = plugin.tools();
        let schema = &tools[1].input_schema;
        assert_eq!(
            schema["properties"]["network"]["enum"],
            json!(["bnb", "ethereum", "solana"])
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let plugin = NetworkPlugin::new(Networks::default());
        let err = plugin.execute("swap", json!({})).await.unwrap_err();
        assert_eq!(err, PluginError::UnknownTool("swap".into()));
    }
}

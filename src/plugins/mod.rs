//! Plugins that ship with the server.
//!
//! Swap, bridge, staking, token and wallet capabilities come from external
//! providers implementing [`Plugin`]; these two need nothing beyond the
//! process configuration.

pub mod network;
pub mod providers;

use std::sync::Arc;

use secrecy::{ExposeSecret as _, SecretString};
use tracing::info;

use crate::agent::{Agent, AgentError, Networks, Plugin, Wallet};
use crate::config::ServerConfig;

pub use network::NetworkPlugin;
pub use providers::{ProviderStatus, ProviderStatusPlugin};

/// The built-in plugin set for a given configuration.
pub fn builtin(config: &ServerConfig, networks: &Networks) -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(NetworkPlugin::new(networks.clone())),
        Arc::new(ProviderStatusPlugin::from_config(config)),
    ]
}

/// Build the agent: wallet, default networks, then every plugin registered
/// in order. Any registration failure aborts startup.
pub async fn build_agent(
    config: &ServerConfig,
    extra: Vec<Arc<dyn Plugin>>,
) -> Result<Agent, AgentError> {
    let networks = Networks::mainnet_defaults();
    let seed_phrase = SecretString::new(config.wallet_mnemonic.expose_secret().into());
    let wallet = Wallet::new(seed_phrase, config.wallet_index);
    let mut agent = Agent::new(wallet, networks.clone());

    for plugin in builtin(config, &networks).into_iter().chain(extra) {
        agent.register_plugin(plugin).await?;
    }

    info!(
        plugins = ?agent.plugin_names(),
        wallet_words = agent.wallet().word_count(),
        wallet_index = agent.wallet().index(),
        tools = agent.list_tools().len(),
        "agent ready"
    );
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_builtin_tools() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        let agent = build_agent(&config, Vec::new()).await.unwrap();
        assert_eq!(agent.plugin_names(), vec!["network", "providers"]);
        let names: Vec<String> = agent.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_network", "list_networks", "list_providers"]);
    }
}

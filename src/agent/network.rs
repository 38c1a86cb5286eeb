use std::collections::BTreeMap;

use serde::Serialize;

pub const BNB_RPC: &str = "https://binance.llamarpc.com";
pub const ETH_RPC: &str = "https://eth.llamarpc.com";
pub const SOL_RPC: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Evm,
    Solana,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Connection parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(rename = "type")]
    pub kind: NetworkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub rpc_url: String,
    pub name: String,
    pub native_currency: NativeCurrency,
}

impl NetworkConfig {
    fn new(
        kind: NetworkType,
        chain_id: Option<u64>,
        rpc_url: &str,
        name: &str,
        currency: (&str, &str, u8),
    ) -> Self {
        let (currency_name, symbol, decimals) = currency;
        Self {
            kind,
            chain_id,
            rpc_url: rpc_url.to_string(),
            name: name.to_string(),
            native_currency: NativeCurrency {
                name: currency_name.to_string(),
                symbol: symbol.to_string(),
                decimals,
            },
        }
    }
}

/// Network id → configuration. Fixed for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Networks(BTreeMap<String, NetworkConfig>);

impl Networks {
    /// The three mainnets the server ships with.
    pub fn mainnet_defaults() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "bnb".to_string(),
            NetworkConfig::new(NetworkType::Evm, Some(56), BNB_RPC, "BNB Chain", ("BNB", "BNB", 18)),
        );
        networks.insert(
            "ethereum".to_string(),
            NetworkConfig::new(NetworkType::Evm, Some(1), ETH_RPC, "Ethereum", ("Ether", "ETH", 18)),
        );
        networks.insert(
            "solana".to_string(),
            NetworkConfig::new(NetworkType::Solana, None, SOL_RPC, "Solana", ("Solana", "SOL", 9)),
        );
        Self(networks)
    }

    pub fn get(&self, id: &str) -> Option<&NetworkConfig> {
        self.0.get(id)
    }

    /// Network ids in ascending order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

use secrecy::{ExposeSecret as _, SecretString};

use crate::agent::wallet::{DEFAULT_MNEMONIC, MNEMONIC_WORD_COUNTS};
use crate::server::MAX_MESSAGE_BYTES;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("WALLET_MNEMONIC must have 12, 15, 18, 21 or 24 words, got {0}")]
    MnemonicLength(usize),
    #[error("{name} must be a non-negative integer, got `{value}`")]
    NotAnInteger { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
#[derive(Debug)]
pub struct ServerConfig {
    pub wallet_mnemonic: SecretString,
    pub wallet_index: u32,
    pub birdeye_api_key: Option<SecretString>,
    pub alchemy_api_key: Option<SecretString>,
    pub max_message_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `WALLET_MNEMONIC` (optional, defaults to the well-known test phrase)
    /// - `WALLET_INDEX` (optional, default 0)
    /// - `BIRDEYE_API_KEY`, `ALCHEMY_API_KEY` (optional), each enables its provider
    /// - `BINK_MAX_MESSAGE_BYTES` (optional, default 1 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mnemonic = get("WALLET_MNEMONIC").unwrap_or_else(|| DEFAULT_MNEMONIC.to_string());
        let wallet_mnemonic = SecretString::new(mnemonic.trim().into());
        let words = wallet_mnemonic.expose_secret().split_whitespace().count();
        if !MNEMONIC_WORD_COUNTS.contains(&words) {
            return Err(ConfigError::MnemonicLength(words));
        }

        let wallet_index = match get("WALLET_INDEX") {
            Some(val) => val.trim().parse::<u32>().map_err(|_| ConfigError::NotAnInteger {
                name: "WALLET_INDEX",
                value: val,
            })?,
            None => 0,
        };

        let max_message_bytes = match get("BINK_MAX_MESSAGE_BYTES") {
            Some(val) => val.trim().parse::<usize>().map_err(|_| ConfigError::NotAnInteger {
                name: "BINK_MAX_MESSAGE_BYTES",
                value: val,
            })?,
            None => MAX_MESSAGE_BYTES,
        };

        Ok(Self {
            wallet_mnemonic,
            wallet_index,
            birdeye_api_key: get("BIRDEYE_API_KEY").map(|k| SecretString::new(k.into())),
            alchemy_api_key: get("ALCHEMY_API_KEY").map(|k| SecretString::new(k.into())),
            max_message_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.wallet_mnemonic.expose_secret(), DEFAULT_MNEMONIC);
        assert_eq!(config.wallet_index, 0);
        assert!(config.birdeye_api_key.is_none());
        assert!(config.alchemy_api_key.is_none());
        assert_eq!(config.max_message_bytes, MAX_MESSAGE_BYTES);
    }

    #[test]
    fn blank_keys_count_as_absent() {
        let config = load(&[("BIRDEYE_API_KEY", "  "), ("ALCHEMY_API_KEY", "alk")]).unwrap();
        assert!(config.birdeye_api_key.is_none());
        assert_eq!(config.alchemy_api_key.unwrap().expose_secret(), "alk");
    }

    #[test]
    fn rejects_short_mnemonic() {
        let err = load(&[("WALLET_MNEMONIC", "one two three")]).unwrap_err();
        assert_eq!(err, ConfigError::MnemonicLength(3));
    }

    #[test]
    fn rejects_bad_index() {
        let err = load(&[("WALLET_INDEX", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnInteger { name: "WALLET_INDEX", .. }));
    }

    #[test]
    fn debug_never_prints_secrets() {
        let config = load(&[("ALCHEMY_API_KEY", "super-secret-key")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("test test"));
    }
}

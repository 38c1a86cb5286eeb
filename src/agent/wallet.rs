use secrecy::{ExposeSecret as _, SecretString};

/// Seed phrase used when `WALLET_MNEMONIC` is unset.
pub const DEFAULT_MNEMONIC: &str = "test test test test test test test test test test test test";

/// Word counts a BIP-39 mnemonic may have.
pub const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Process-scoped wallet credentials. Key derivation is left to the plugins
/// that need it; the phrase never leaves this type.
#[derive(Debug)]
pub struct Wallet {
    seed_phrase: SecretString,
    index: u32,
}

impl Wallet {
    pub fn new(seed_phrase: SecretString, index: u32) -> Self {
        Self { seed_phrase, index }
    }

    /// Account index used for derivation.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn word_count(&self) -> usize {
        self.seed_phrase.expose_secret().split_whitespace().count()
    }
}

//! Signing wallet configuration.

use serde::Deserialize;

/// The private key is read from `WALLET_PRIVATE_KEY` at load time, never from the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    #[serde(skip)]
    pub private_key: Option<String>,
}

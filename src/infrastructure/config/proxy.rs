//! Proxy account configuration.

use alloy_primitives::Address;
use serde::Deserialize;

use crate::port::ProxyMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// Safe proxy owned by the signer.
    #[serde(default)]
    pub address: Address,
    /// A relay pays gas and charges a fee per batch.
    #[serde(default)]
    pub relay: bool,
    #[serde(default)]
    pub connected_to_safe: bool,
    #[serde(default)]
    pub safe_app: bool,
}

impl ProxyConfig {
    #[must_use]
    pub const fn mode(&self) -> ProxyMode {
        ProxyMode {
            relay: self.relay,
            connected_to_safe: self.connected_to_safe,
            safe_app: self.safe_app,
        }
    }
}

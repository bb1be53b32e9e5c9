//! Network and contract address configuration.

use alloy_primitives::{address, Address};
use serde::Deserialize;

use crate::application::pipeline::Contracts;

/// Chain the pipelines run on.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default)]
    pub rpc_url: String,
}

const fn default_chain_id() -> u64 {
    100
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            rpc_url: String::new(),
        }
    }
}

/// Native-asset bridge on the sidechain (`relayTokens(receiver)`).
const NATIVE_BRIDGE: Address = address!("7301CFA0e1756B71869E93d4e4Dca5c7d0eb0AA6");

/// Omni-bridge mediator for ERC-677 tokens (`transferAndCall`).
const OMNI_BRIDGE: Address = address!("f6A78083ca3e2a662D6dd1703c939c8aCE2e268d");

/// Deployed contract addresses.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub conditional_tokens: Address,
    #[serde(default)]
    pub market_maker_factory: Address,
    #[serde(default)]
    pub realitio: Address,
    /// Realitio proxy reporting categorical answers.
    #[serde(default)]
    pub oracle: Address,
    #[serde(default)]
    pub scalar_adapter: Address,
    #[serde(default)]
    pub wrapped_native: Address,
    #[serde(default)]
    pub multisend: Address,
    /// Implementation an up-to-date proxy delegates to.
    #[serde(default)]
    pub proxy_implementation: Address,
    #[serde(default = "default_omni_bridge")]
    pub omni_bridge: Address,
    #[serde(default = "default_native_bridge")]
    pub native_bridge: Address,
    /// Mainnet-side bridge used by `send_to_sidechain`.
    #[serde(default)]
    pub foreign_bridge: Address,
}

const fn default_omni_bridge() -> Address {
    OMNI_BRIDGE
}

const fn default_native_bridge() -> Address {
    NATIVE_BRIDGE
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            conditional_tokens: Address::ZERO,
            market_maker_factory: Address::ZERO,
            realitio: Address::ZERO,
            oracle: Address::ZERO,
            scalar_adapter: Address::ZERO,
            wrapped_native: Address::ZERO,
            multisend: Address::ZERO,
            proxy_implementation: Address::ZERO,
            omni_bridge: OMNI_BRIDGE,
            native_bridge: NATIVE_BRIDGE,
            foreign_bridge: Address::ZERO,
        }
    }
}

impl ContractsConfig {
    /// Addresses every pipeline needs, by config field name.
    #[must_use]
    pub fn required(&self) -> [(&'static str, Address); 6] {
        [
            ("contracts.conditional_tokens", self.conditional_tokens),
            ("contracts.market_maker_factory", self.market_maker_factory),
            ("contracts.realitio", self.realitio),
            ("contracts.oracle", self.oracle),
            ("contracts.wrapped_native", self.wrapped_native),
            ("contracts.multisend", self.multisend),
        ]
    }
}

impl From<&ContractsConfig> for Contracts {
    fn from(c: &ContractsConfig) -> Self {
        Self {
            conditional_tokens: c.conditional_tokens,
            market_maker_factory: c.market_maker_factory,
            realitio: c.realitio,
            oracle: c.oracle,
            scalar_adapter: c.scalar_adapter,
            wrapped_native: c.wrapped_native,
            proxy_implementation: c.proxy_implementation,
            omni_bridge: c.omni_bridge,
            native_bridge: c.native_bridge,
            foreign_bridge: c.foreign_bridge,
        }
    }
}

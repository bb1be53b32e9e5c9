//! Off-chain services, polling and execution settings.

use serde::Deserialize;

use crate::application::tracker::PollingPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    /// GraphQL endpoint of the market subgraph.
    #[serde(default)]
    pub subgraph_url: String,
    #[serde(default)]
    pub safe_tx_service_url: String,
    /// Only needed when `proxy.relay` is set.
    #[serde(default)]
    pub relay_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Zero waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_interval_ms() -> u64 {
    2_000
}

const fn default_timeout_secs() -> u64 {
    600
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PollingConfig {
    #[must_use]
    pub fn policy(&self) -> PollingPolicy {
        PollingPolicy::from_millis(self.interval_ms, self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Gas limit used when the proxy holds the funds.
    #[serde(default = "default_gas")]
    pub default_gas: u64,
}

const fn default_gas() -> u64 {
    1_500_000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            default_gas: default_gas(),
        }
    }
}

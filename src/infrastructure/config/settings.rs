//! Application configuration loading and validation.
//!
//! [`Config`] aggregates every section of the TOML file. The signing key is
//! never read from the file; it comes from `WALLET_PRIVATE_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use ctfpipe::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::market::MarketDefaults;
use super::network::{ContractsConfig, NetworkConfig};
use super::proxy::ProxyConfig;
use super::service::{ExecutionConfig, PollingConfig, ServicesConfig};
use super::wallet::WalletConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Defaults for market creation.
    #[serde(default)]
    pub market: MarketDefaults,

    #[serde(default)]
    pub services: ServicesConfig,

    /// Confirmation polling cadence and deadline.
    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(skip)]
    pub wallet: WalletConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed, or
    /// validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// The signing key, required by commands that submit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `WALLET_PRIVATE_KEY` is unset.
    pub fn private_key(&self) -> Result<&str> {
        self.wallet.private_key.as_deref().ok_or_else(|| {
            ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into()
        })
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.rpc_url",
            }
            .into());
        }
        url::Url::parse(&self.network.rpc_url).map_err(|e| ConfigError::InvalidValue {
            field: "network.rpc_url",
            reason: e.to_string(),
        })?;
        if self.network.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.chain_id",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        for (field, address) in self.contracts.required() {
            if address == Address::ZERO {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        if self.market.fee < Decimal::ZERO || self.market.fee >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "market.fee",
                reason: "must be at least 0 and below 1".to_string(),
            }
            .into());
        }
        if self.market.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "market.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.proxy.relay && self.services.relay_url.is_none() {
            return Err(ConfigError::MissingField {
                field: "services.relay_url",
            }
            .into());
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.execution.default_gas == 0 {
            return Err(ConfigError::InvalidValue {
                field: "execution.default_gas",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("unknown format '{other}' (expected pretty or json)"),
            }
            .into()),
        }
    }
}

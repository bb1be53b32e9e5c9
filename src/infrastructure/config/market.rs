//! Defaults applied to newly created markets.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDefaults {
    /// Swap fee as a fraction, e.g. `0.02` for 2%.
    #[serde(default = "default_fee")]
    pub fee: Decimal,
    #[serde(default)]
    pub arbitrator: Address,
    /// Realitio answer timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_fee() -> Decimal {
    Decimal::new(2, 2)
}

const fn default_timeout() -> u32 {
    86_400
}

fn default_language() -> String {
    "en".into()
}

fn default_category() -> String {
    "miscellaneous".into()
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            fee: default_fee(),
            arbitrator: Address::ZERO,
            timeout_secs: default_timeout(),
            language: default_language(),
            category: default_category(),
        }
    }
}

//! Collateral tokens.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Address standing in for the chain's native asset.
pub const NATIVE_ASSET: Address = Address::ZERO;

/// An ERC-20 collateral token, or the native pseudo-asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    #[must_use]
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// The native asset of a chain (ETH, xDAI, ...).
    #[must_use]
    pub fn native(symbol: impl Into<String>) -> Self {
        Self::new(NATIVE_ASSET, symbol, 18)
    }

    /// Whether this is the native pseudo-asset that must be wrapped first.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.address == NATIVE_ASSET
    }

    /// Whether this token lives at `address`.
    #[must_use]
    pub fn is(&self, address: Address) -> bool {
        self.address == address
    }
}

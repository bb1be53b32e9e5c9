//! Off-chain services consulted around submission.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Resolves Safe transaction hashes to mined transaction hashes.
#[async_trait]
pub trait SafeTransactionService: Send + Sync {
    /// Mined transaction hash for `safe_tx_hash`, `None` while not executed.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    async fn transaction_hash(&self, chain_id: u64, safe_tx_hash: B256) -> Result<Option<B256>>;
}

/// Reports how far the market indexer has synced.
#[async_trait]
pub trait IndexerStatus: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the indexer cannot be reached.
    async fn latest_indexed_block(&self, chain_id: u64) -> Result<u64>;
}

/// Relay sponsoring gas in exchange for a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayInfo {
    pub address: Address,
    pub fee: U256,
}

#[async_trait]
pub trait RelayInfoSource: Send + Sync {
    /// Current relay address and fee.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be reached.
    async fn info(&self) -> Result<RelayInfo>;
}

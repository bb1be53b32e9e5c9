//! Wallet provider port: the signer's view of the chain.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;

use crate::domain::transaction::Receipt;
use crate::error::Result;

/// Signer-bound access to a JSON-RPC node.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Address of the externally owned account signing for the user.
    fn signer_address(&self) -> Address;

    /// Chain id of the connected network.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be reached.
    async fn chain_id(&self) -> Result<u64>;

    /// Receipt for `hash`, or `None` while it is still pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the node rejects the query.
    async fn wait_for_transaction(&self, hash: B256) -> Result<Option<Receipt>>;

    /// Raw JSON-RPC request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the node returns an error.
    async fn send(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value>;
}

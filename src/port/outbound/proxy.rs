//! Proxy executor port: the smart-contract account that runs batches.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::transaction::{Submission, TransactionStep, TxOptions};
use crate::error::Result;

/// How the proxy is being driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProxyMode {
    /// A relay sponsors gas and takes a fee.
    pub relay: bool,
    /// The proxy is operated through a Safe multisig interface.
    pub connected_to_safe: bool,
    /// Running inside a Safe app, where the proxy itself is the user.
    pub safe_app: bool,
}

impl ProxyMode {
    /// Whether the proxy holds funds on the user's behalf.
    ///
    /// In that case deposits into the proxy and deliveries back to the
    /// signer are skipped, and gas is fixed.
    #[must_use]
    pub const fn holds_funds(self) -> bool {
        self.relay || self.connected_to_safe || self.safe_app
    }
}

/// Executes batches of calls atomically through a proxy account.
#[async_trait]
pub trait ProxyExecutor: Send + Sync {
    /// Address of the proxy account.
    fn address(&self) -> Address;

    fn mode(&self) -> ProxyMode;

    /// Submit `steps` as one atomic batch.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or submission fails. Nothing is sent in
    /// that case.
    async fn exec_transactions(
        &self,
        steps: &[TransactionStep],
        options: &TxOptions,
    ) -> Result<Submission>;

    /// Number of owner signatures the proxy requires.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold cannot be read.
    async fn threshold(&self) -> Result<u64>;

    /// Whether the proxy contract exists on chain yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the code lookup fails.
    async fn is_deployed(&self) -> Result<bool>;

    /// Implementation the proxy currently delegates to.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    async fn master_copy(&self) -> Result<Address>;
}

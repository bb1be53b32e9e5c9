//! Shared handles available to every stage.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use tokio::sync::watch;
use tracing::warn;

use crate::application::tracker::ConfirmationTracker;
use crate::domain::status::TransactionStatus;
use crate::error::PipelineError;
use crate::port::{ChainReader, ProxyExecutor, RelayInfoSource, WalletProvider};

/// Contract addresses of the network the pipelines run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contracts {
    pub conditional_tokens: Address,
    pub market_maker_factory: Address,
    pub realitio: Address,
    /// Realitio proxy that reports categorical answers to the conditional tokens.
    pub oracle: Address,
    pub scalar_adapter: Address,
    pub wrapped_native: Address,
    /// Implementation an up-to-date proxy delegates to.
    pub proxy_implementation: Address,
    pub omni_bridge: Address,
    pub native_bridge: Address,
    pub foreign_bridge: Address,
}

impl Contracts {
    /// Scalar adapter, which only scalar markets need.
    ///
    /// # Errors
    ///
    /// `MissingInput("contracts.scalar_adapter")` while it is unset.
    pub fn require_scalar_adapter(&self) -> Result<Address, PipelineError> {
        configured(self.scalar_adapter, "contracts.scalar_adapter")
    }

    /// # Errors
    ///
    /// `MissingInput("contracts.proxy_implementation")` while it is unset.
    pub fn require_proxy_implementation(&self) -> Result<Address, PipelineError> {
        configured(self.proxy_implementation, "contracts.proxy_implementation")
    }

    /// # Errors
    ///
    /// `MissingInput("contracts.foreign_bridge")` while it is unset.
    pub fn require_foreign_bridge(&self) -> Result<Address, PipelineError> {
        configured(self.foreign_bridge, "contracts.foreign_bridge")
    }
}

// A zero address accepts every call and does nothing with it.
fn configured(address: Address, field: &'static str) -> Result<Address, PipelineError> {
    if address.is_zero() {
        return Err(PipelineError::MissingInput(field));
    }
    Ok(address)
}

/// Publishes lifecycle status and the submitted hash to observers.
#[derive(Debug)]
pub struct StatusBoard {
    status: watch::Sender<TransactionStatus>,
    tx_hash: watch::Sender<Option<B256>>,
}

impl StatusBoard {
    #[must_use]
    pub fn new() -> Self {
        let (status, _) = watch::channel(TransactionStatus::Idle);
        let (tx_hash, _) = watch::channel(None);
        Self { status, tx_hash }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TransactionStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn subscribe_hash(&self) -> watch::Receiver<Option<B256>> {
        self.tx_hash.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> TransactionStatus {
        *self.status.borrow()
    }

    /// Start a fresh lifecycle for a new action.
    pub fn reset(&self) {
        self.status.send_replace(TransactionStatus::Idle);
        self.tx_hash.send_replace(None);
    }

    /// Move forward; out-of-order transitions are logged and ignored.
    pub fn advance(&self, next: TransactionStatus) {
        self.status.send_if_modified(|current| match current.advance(next) {
            Ok(status) => {
                *current = status;
                true
            }
            Err((from, to)) => {
                warn!(%from, %to, "Ignoring invalid status transition");
                false
            }
        });
    }

    pub fn set_hash(&self, hash: Option<B256>) {
        self.tx_hash.send_replace(hash);
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Ports, addresses and settings a pipeline runs against.
pub struct StageEnv {
    pub wallet: Arc<dyn WalletProvider>,
    pub proxy: Arc<dyn ProxyExecutor>,
    pub chain: Arc<dyn ChainReader>,
    pub relay: Arc<dyn RelayInfoSource>,
    pub tracker: ConfirmationTracker,
    pub contracts: Contracts,
    /// Gas limit used when the proxy holds funds itself.
    pub default_gas: u64,
    pub status: StatusBoard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_board_rejects_backwards_moves() {
        let board = StatusBoard::new();
        let rx = board.subscribe();
        board.advance(TransactionStatus::TransactionSubmitted);
        board.advance(TransactionStatus::WaitingConfirmation);
        assert_eq!(*rx.borrow(), TransactionStatus::TransactionSubmitted);

        board.reset();
        assert_eq!(board.current(), TransactionStatus::Idle);
    }

    #[test]
    fn unset_optional_contracts_are_reported_by_field() {
        let contracts = Contracts {
            conditional_tokens: Address::repeat_byte(1),
            market_maker_factory: Address::repeat_byte(2),
            realitio: Address::repeat_byte(3),
            oracle: Address::repeat_byte(4),
            scalar_adapter: Address::ZERO,
            wrapped_native: Address::repeat_byte(6),
            proxy_implementation: Address::ZERO,
            omni_bridge: Address::repeat_byte(8),
            native_bridge: Address::repeat_byte(9),
            foreign_bridge: Address::repeat_byte(10),
        };

        assert!(matches!(
            contracts.require_scalar_adapter(),
            Err(PipelineError::MissingInput("contracts.scalar_adapter"))
        ));
        assert!(matches!(
            contracts.require_proxy_implementation(),
            Err(PipelineError::MissingInput("contracts.proxy_implementation"))
        ));
        assert_eq!(contracts.require_foreign_bridge().unwrap(), Address::repeat_byte(10));
    }
}

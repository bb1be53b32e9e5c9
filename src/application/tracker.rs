//! Confirmation tracking for submitted batches.
//!
//! Follows a submission until it is mined and indexed:
//!
//! ```text
//! direct hash ──────────────────────────────┐
//!                                           ├─> receipt ─> indexer sync ─> Confirmed
//! safe tx hash ─(threshold 1)─> tx service ─┘
//!              └(threshold > 1)─> PendingSignatures
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::B256;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::domain::transaction::{Confirmation, Receipt, Submission};
use crate::error::{Error, ExecutionError, PollingError, Result};
use crate::port::{IndexerStatus, ProxyExecutor, SafeTransactionService, WalletProvider};

/// Fixed-interval polling with an optional deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub interval: Duration,
    /// `None` polls until the value appears.
    pub timeout: Option<Duration>,
}

impl PollingPolicy {
    /// Interval in milliseconds, timeout in seconds; a zero timeout means unbounded.
    #[must_use]
    pub fn from_millis(interval_ms: u64, timeout_secs: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }
}

/// Waits for submissions to be mined and indexed.
pub struct ConfirmationTracker {
    wallet: Arc<dyn WalletProvider>,
    proxy: Arc<dyn ProxyExecutor>,
    safe_service: Arc<dyn SafeTransactionService>,
    indexer: Arc<dyn IndexerStatus>,
    policy: PollingPolicy,
}

impl ConfirmationTracker {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        proxy: Arc<dyn ProxyExecutor>,
        safe_service: Arc<dyn SafeTransactionService>,
        indexer: Arc<dyn IndexerStatus>,
        policy: PollingPolicy,
    ) -> Self {
        Self {
            wallet,
            proxy,
            safe_service,
            indexer,
            policy,
        }
    }

    /// Wait for `submission` to settle.
    ///
    /// # Errors
    ///
    /// Returns [`PollingError::Timeout`] when a wait exceeds the policy's
    /// timeout and [`ExecutionError::Reverted`] for a failed receipt.
    pub async fn wait(&self, submission: &Submission) -> Result<Confirmation> {
        let direct = submission
            .hash
            .filter(|_| !self.proxy.mode().connected_to_safe);

        let receipt = match direct {
            Some(hash) => {
                info!(%hash, "Waiting for transaction");
                self.receipt_for(hash).await?
            }
            None => {
                let safe_tx_hash = submission.hash.or(submission.safe_tx_hash);
                let threshold = self.proxy.threshold().await?;
                let Some(safe_tx_hash) = safe_tx_hash.filter(|_| threshold == 1) else {
                    info!(threshold, "Batch needs more signatures");
                    return Ok(Confirmation::PendingSignatures { safe_tx_hash });
                };

                info!(%safe_tx_hash, "Waiting for Safe transaction");
                let chain_id = self.wallet.chain_id().await?;
                let hash = self
                    .poll("safe transaction", || {
                        self.safe_service.transaction_hash(chain_id, safe_tx_hash)
                    })
                    .await?;
                info!(%hash, "Safe transaction executed");
                self.receipt_for(hash).await?
            }
        };

        if !receipt.success {
            return Err(ExecutionError::Reverted {
                hash: receipt.transaction_hash.to_string(),
            }
            .into());
        }

        if let Some(block) = receipt.block_number {
            let chain_id = self.wallet.chain_id().await?;
            self.poll("indexer sync", move || async move {
                let indexed = self.indexer.latest_indexed_block(chain_id).await?;
                Ok::<_, Error>((indexed >= block).then_some(indexed))
            })
            .await?;
            debug!(block, "Indexer caught up");
        }

        Ok(Confirmation::Confirmed(receipt))
    }

    async fn receipt_for(&self, hash: B256) -> Result<Receipt> {
        self.poll("transaction receipt", || self.wallet.wait_for_transaction(hash))
            .await
    }

    /// Poll `attempt` until it yields a value.
    ///
    /// Failed or stalled attempts are logged and retried; only the deadline
    /// ends the loop. Each attempt is cut off at the deadline.
    async fn poll<T, F, Fut>(&self, what: &'static str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let started = Instant::now();
        let deadline = self.policy.timeout.map(|timeout| started + timeout);
        loop {
            let outcome = match deadline {
                Some(deadline) => timeout_at(deadline, attempt()).await.unwrap_or_else(|_| {
                    Err(PollingError::Transient("attempt stalled".to_string()).into())
                }),
                None => attempt().await,
            };

            match outcome {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => debug!(what, "Not ready yet"),
                Err(e) => {
                    let error = PollingError::Transient(e.to_string());
                    warn!(what, error = %error, "Poll attempt failed");
                }
            }

            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(PollingError::Timeout {
                            what,
                            waited: now - started,
                        }
                        .into());
                    }
                    sleep(self.policy.interval.min(deadline - now)).await;
                }
                None => sleep(self.policy.interval).await,
            }
        }
    }
}

//! Safe proxy owned by the signing account.
//!
//! Batches go through `execTransaction`. Several steps are packed for the
//! MultiSend library and delegate-called; a single step is called directly.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contracts::{IMultiSend, ISafe};
use crate::domain::transaction::{Submission, TransactionStep, TxOptions};
use crate::error::{ExecutionError, Result};
use crate::port::{ProxyExecutor, ProxyMode};

/// Safe operation codes.
const CALL: u8 = 0;
const DELEGATE_CALL: u8 = 1;

/// Pack steps as `operation ‖ to ‖ value ‖ data length ‖ data` for MultiSend.
#[must_use]
pub fn encode_multisend(steps: &[TransactionStep]) -> Bytes {
    let mut packed = Vec::new();
    for step in steps {
        packed.push(CALL);
        packed.extend_from_slice(step.to().as_slice());
        packed.extend_from_slice(&step.value_or_zero().to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(step.data().len()).to_be_bytes::<32>());
        packed.extend_from_slice(step.data());
    }
    Bytes::from(packed)
}

/// Owner signature accepted without ECDSA when the owner sends the transaction.
#[must_use]
pub fn prevalidated_signature(owner: Address) -> Bytes {
    let mut signature = [0u8; 65];
    signature[12..32].copy_from_slice(owner.as_slice());
    signature[64] = 1;
    Bytes::from(signature.to_vec())
}

/// Outer Safe call for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SafeCall {
    to: Address,
    value: U256,
    data: Bytes,
    operation: u8,
}

fn safe_call(steps: &[TransactionStep], multisend: Address) -> Option<SafeCall> {
    match steps {
        [] => None,
        [single] => Some(SafeCall {
            to: single.to(),
            value: single.value_or_zero(),
            data: single.data().clone(),
            operation: CALL,
        }),
        many => Some(SafeCall {
            to: multisend,
            value: U256::ZERO,
            data: IMultiSend::multiSendCall {
                transactions: encode_multisend(many),
            }
            .abi_encode()
            .into(),
            operation: DELEGATE_CALL,
        }),
    }
}

pub struct OwnedSafeProxy {
    provider: DynProvider,
    owner: Address,
    address: Address,
    multisend: Address,
    mode: ProxyMode,
}

impl OwnedSafeProxy {
    #[must_use]
    pub fn new(
        provider: DynProvider,
        owner: Address,
        address: Address,
        multisend: Address,
        mode: ProxyMode,
    ) -> Self {
        Self {
            provider,
            owner,
            address,
            multisend,
            mode,
        }
    }
}

#[async_trait]
impl ProxyExecutor for OwnedSafeProxy {
    fn address(&self) -> Address {
        self.address
    }

    fn mode(&self) -> ProxyMode {
        self.mode
    }

    async fn exec_transactions(
        &self,
        steps: &[TransactionStep],
        options: &TxOptions,
    ) -> Result<Submission> {
        let call = safe_call(steps, self.multisend)
            .ok_or_else(|| ExecutionError::TransactionRejected("empty batch".to_string()))?;
        let safe = ISafe::new(self.address, &self.provider);

        let nonce = safe
            .nonce()
            .call()
            .await
            .map_err(|e| ExecutionError::Provider(format!("safe nonce: {e}")))?;
        let safe_tx_hash: B256 = safe
            .getTransactionHash(
                call.to,
                call.value,
                call.data.clone(),
                call.operation,
                U256::ZERO,
                U256::ZERO,
                U256::ZERO,
                Address::ZERO,
                Address::ZERO,
                nonce,
            )
            .call()
            .await
            .map_err(|e| ExecutionError::Provider(format!("safe tx hash: {e}")))?;
        debug!(%safe_tx_hash, steps = steps.len(), operation = call.operation, "Prepared Safe transaction");

        let mut request = safe
            .execTransaction(
                call.to,
                call.value,
                call.data,
                call.operation,
                U256::ZERO,
                U256::ZERO,
                U256::ZERO,
                Address::ZERO,
                Address::ZERO,
                prevalidated_signature(self.owner),
            )
            .value(options.value.unwrap_or_default());
        if let Some(gas) = options.gas {
            request = request.gas(gas);
        }

        let pending = request
            .send()
            .await
            .map_err(|e| ExecutionError::TransactionRejected(e.to_string()))?;
        let hash = *pending.tx_hash();
        info!(%hash, safe = %self.address, "Safe transaction sent");

        Ok(Submission {
            hash: Some(hash),
            safe_tx_hash: Some(safe_tx_hash),
        })
    }

    async fn threshold(&self) -> Result<u64> {
        let threshold = ISafe::new(self.address, &self.provider)
            .getThreshold()
            .call()
            .await
            .map_err(|e| ExecutionError::Provider(format!("safe threshold: {e}")))?;
        Ok(threshold.saturating_to::<u64>())
    }

    async fn is_deployed(&self) -> Result<bool> {
        let code = self
            .provider
            .get_code_at(self.address)
            .await
            .map_err(|e| ExecutionError::Provider(format!("proxy code: {e}")))?;
        Ok(!code.is_empty())
    }

    async fn master_copy(&self) -> Result<Address> {
        // Slot 0 of a Safe proxy holds its implementation.
        let slot = self
            .provider
            .get_storage_at(self.address, U256::ZERO)
            .await
            .map_err(|e| ExecutionError::Provider(format!("proxy storage: {e}")))?;
        Ok(Address::from_slice(&slot.to_be_bytes::<32>()[12..]))
    }
}

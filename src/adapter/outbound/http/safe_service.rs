//! Safe transaction service client.

use alloy_primitives::B256;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::relay::as_directory;
use crate::error::{PipelineError, Result};
use crate::port::SafeTransactionService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultisigTransaction {
    /// Set once the Safe transaction has been executed on chain.
    transaction_hash: Option<B256>,
}

/// REST client for one network's Safe transaction service.
#[derive(Debug, Clone)]
pub struct SafeTxServiceClient {
    client: Client,
    base: Url,
    chain_id: u64,
}

impl SafeTxServiceClient {
    #[must_use]
    pub fn new(base: Url, chain_id: u64) -> Self {
        Self {
            client: Client::new(),
            base: as_directory(base),
            chain_id,
        }
    }

    fn endpoint(&self, safe_tx_hash: B256) -> Result<Url> {
        Ok(self
            .base
            .join(&format!("api/v1/multisig-transactions/{safe_tx_hash}/"))?)
    }
}

#[async_trait]
impl SafeTransactionService for SafeTxServiceClient {
    async fn transaction_hash(&self, chain_id: u64, safe_tx_hash: B256) -> Result<Option<B256>> {
        if chain_id != self.chain_id {
            return Err(PipelineError::Unsupported(format!(
                "no Safe transaction service for chain {chain_id}"
            ))
            .into());
        }

        let response = self.client.get(self.endpoint(safe_tx_hash)?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%safe_tx_hash, "Safe transaction not indexed yet");
            return Ok(None);
        }
        let tx = response
            .error_for_status()?
            .json::<MultisigTransaction>()
            .await?;
        Ok(tx.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_hash_to_base() {
        let base = Url::parse("https://safe-transaction.xdai.gnosis.io/").unwrap();
        let client = SafeTxServiceClient::new(base, 100);

        let url = client.endpoint(B256::repeat_byte(0x01)).unwrap();

        assert!(url
            .as_str()
            .starts_with("https://safe-transaction.xdai.gnosis.io/api/v1/multisig-transactions/0x0101"));
        assert!(url.as_str().ends_with('/'));
    }

    #[test]
    fn pending_transaction_has_no_hash() {
        let tx: MultisigTransaction =
            serde_json::from_str(r#"{"transactionHash": null, "nonce": 3}"#).unwrap();
        assert!(tx.transaction_hash.is_none());
    }

    #[test]
    fn executed_transaction_has_hash() {
        let hash = B256::repeat_byte(0x42);
        let body = format!(r#"{{"transactionHash": "{hash}"}}"#);
        let tx: MultisigTransaction = serde_json::from_str(&body).unwrap();
        assert_eq!(tx.transaction_hash, Some(hash));
    }

    #[tokio::test]
    async fn other_chains_are_rejected() {
        let client = SafeTxServiceClient::new(Url::parse("http://localhost/").unwrap(), 100);
        let result = client.transaction_hash(1, B256::ZERO).await;
        assert!(result.is_err());
    }
}

//! Composition root: builds the transaction service from configuration.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::info;
use url::Url;

use crate::adapter::outbound::chain::{AlloyChain, OwnedSafeProxy, ReaderContracts};
use crate::adapter::outbound::http::{NoRelay, RelayClient, SafeTxServiceClient, SubgraphClient};
use crate::application::pipeline::{Contracts, StageEnv, StatusBoard};
use crate::application::service::TransactionService;
use crate::application::tracker::ConfirmationTracker;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::{ProxyExecutor, RelayInfoSource, WalletProvider};

fn service_url(field: &'static str, value: &str) -> Result<Url> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Wire the alloy adapters, HTTP clients and tracker into a service.
///
/// # Errors
///
/// Returns a configuration error when the key, the proxy address or a
/// service URL is missing or invalid.
pub fn build_service(config: &Config) -> Result<TransactionService> {
    let chain = Arc::new(AlloyChain::connect(
        &config.network.rpc_url,
        config.private_key()?,
        ReaderContracts {
            conditional_tokens: config.contracts.conditional_tokens,
            market_maker_factory: config.contracts.market_maker_factory,
            realitio: config.contracts.realitio,
        },
    )?);

    if config.proxy.address == Address::ZERO {
        return Err(ConfigError::MissingField {
            field: "proxy.address",
        }
        .into());
    }
    let mode = config.proxy.mode();
    let proxy: Arc<dyn ProxyExecutor> = Arc::new(OwnedSafeProxy::new(
        chain.provider(),
        chain.signer_address(),
        config.proxy.address,
        config.contracts.multisend,
        mode,
    ));

    let relay: Arc<dyn RelayInfoSource> = match &config.services.relay_url {
        Some(url) if mode.relay => Arc::new(RelayClient::new(service_url(
            "services.relay_url",
            url,
        )?)),
        _ => Arc::new(NoRelay),
    };

    let chain_id = config.network.chain_id;
    let safe_service = Arc::new(SafeTxServiceClient::new(
        service_url(
            "services.safe_tx_service_url",
            &config.services.safe_tx_service_url,
        )?,
        chain_id,
    ));
    let indexer = Arc::new(SubgraphClient::new(
        service_url("services.subgraph_url", &config.services.subgraph_url)?,
        chain_id,
    ));

    let wallet: Arc<dyn WalletProvider> = chain.clone();
    let tracker = ConfirmationTracker::new(
        wallet.clone(),
        proxy.clone(),
        safe_service,
        indexer,
        config.polling.policy(),
    );

    info!(
        signer = %wallet.signer_address(),
        proxy = %config.proxy.address,
        chain_id,
        relay = mode.relay,
        "Transaction service ready"
    );

    Ok(TransactionService::new(StageEnv {
        wallet,
        proxy,
        chain,
        relay,
        tracker,
        contracts: Contracts::from(&config.contracts),
        default_gas: config.execution.default_gas,
        status: StatusBoard::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_service_url_is_missing() {
        let err = service_url("services.subgraph_url", " ").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: "services.subgraph_url"
            })
        ));
    }

    #[test]
    fn malformed_service_url_is_invalid() {
        let err = service_url("services.subgraph_url", "not a url").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn build_requires_private_key() {
        let config = Config::default();
        assert!(matches!(
            build_service(&config),
            Err(Error::Config(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY"
            }))
        ));
    }
}

//! JSON-RPC chain adapter.
//!
//! Implements [`WalletProvider`] and [`ChainReader`] over an alloy HTTP
//! provider with a local signer attached.

use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::Filter;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use tracing::debug;

use super::contracts::{
    ICloneConstructor, IConditionalTokensView, IERC20View, IFixedProductMarketMakerView,
    IMarketMakerFactoryView, IRealitioView,
};
use crate::domain::market::ClaimHistory;
use crate::domain::transaction::Receipt;
use crate::error::{ConfigError, Error, ExecutionError, Result};
use crate::port::{ChainReader, MarketMakerSeed, WalletProvider};

/// Creation code prefix of the factory's minimal clone, before the factory address.
const CLONE_PREFIX: [u8; 13] = [
    0x3d, 0x3d, 0x60, 0x63, 0x80, 0x38, 0x03, 0x80, 0x91, 0x3d, 0x39, 0x3d, 0x73,
];

/// Clone code between the factory address and the implementation address.
const CLONE_MIDDLE: [u8; 31] = [
    0x5a, 0xf4, 0x60, 0x2a, 0x57, 0x60, 0x00, 0x80, 0xfd, 0x5b, 0x60, 0x2d, 0x80, 0x60, 0x36,
    0x60, 0x00, 0x39, 0x60, 0x00, 0xf3, 0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d,
    0x73,
];

/// Clone code after the implementation address.
const CLONE_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// Contract addresses the reader queries directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderContracts {
    pub conditional_tokens: Address,
    pub market_maker_factory: Address,
    pub realitio: Address,
}

fn provider_err<E: Display>(what: &'static str) -> impl FnOnce(E) -> Error {
    move |e| ExecutionError::Provider(format!("{what}: {e}")).into()
}

/// Signer-bound alloy provider.
pub struct AlloyChain {
    provider: DynProvider,
    signer: Address,
    contracts: ReaderContracts,
}

impl AlloyChain {
    /// Connect to `rpc_url` with `private_key` as the signing wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or the URL is invalid.
    pub fn connect(rpc_url: &str, private_key: &str, contracts: ReaderContracts) -> Result<Self> {
        let signer = parse_signer(private_key)?;
        let address = signer.address();
        let url: url::Url = rpc_url.parse()?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        Ok(Self::with_provider(provider, address, contracts))
    }

    #[must_use]
    pub fn with_provider(provider: DynProvider, signer: Address, contracts: ReaderContracts) -> Self {
        Self {
            provider,
            signer,
            contracts,
        }
    }

    /// Shared provider, for adapters that send through the same wallet.
    #[must_use]
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }
}

/// Parse a hex private key into a local signer.
///
/// # Errors
///
/// Returns [`ConfigError`] for a missing or malformed key.
pub fn parse_signer(private_key: &str) -> Result<PrivateKeySigner> {
    if private_key.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "WALLET_PRIVATE_KEY",
        }
        .into());
    }
    PrivateKeySigner::from_str(private_key.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field: "WALLET_PRIVATE_KEY",
            reason: e.to_string(),
        }
        .into()
    })
}

/// CREATE2 address of a market maker cloned by the deterministic factory.
#[must_use]
pub fn market_maker_address(
    factory: Address,
    implementation: Address,
    conditional_tokens: Address,
    seed: &MarketMakerSeed,
) -> Address {
    let salt = keccak256((seed.creator, seed.salt_nonce).abi_encode());
    let cons_data = (
        conditional_tokens,
        seed.collateral,
        vec![seed.condition_id],
        seed.fee,
    )
        .abi_encode_params();
    let constructor = ICloneConstructor::cloneConstructorCall {
        consData: Bytes::from(cons_data),
    }
    .abi_encode();

    let mut init_code = Vec::with_capacity(
        CLONE_PREFIX.len() + CLONE_MIDDLE.len() + CLONE_SUFFIX.len() + 40 + constructor.len(),
    );
    init_code.extend_from_slice(&CLONE_PREFIX);
    init_code.extend_from_slice(factory.as_slice());
    init_code.extend_from_slice(&CLONE_MIDDLE);
    init_code.extend_from_slice(implementation.as_slice());
    init_code.extend_from_slice(&CLONE_SUFFIX);
    init_code.extend_from_slice(&constructor);

    factory.create2_from_code(salt.0, init_code)
}

/// Order answers newest first, pairing each with the history hash before it.
fn claim_history_from(mut answers: Vec<(u64, u64, IRealitioView::LogNewAnswer)>) -> ClaimHistory {
    answers.sort_by_key(|(block, index, _)| (*block, *index));

    let mut history = ClaimHistory::default();
    for (i, (_, _, event)) in answers.iter().enumerate().rev() {
        let previous = if i == 0 {
            B256::ZERO
        } else {
            answers[i - 1].2.history_hash
        };
        history.history_hashes.push(previous);
        history.answerers.push(event.user);
        history.bonds.push(event.bond);
        history.answers.push(event.answer);
    }
    history
}

#[async_trait]
impl WalletProvider for AlloyChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(provider_err("chain id"))
    }

    async fn wait_for_transaction(&self, hash: B256) -> Result<Option<Receipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(provider_err("transaction receipt"))?;
        Ok(receipt.map(|r| Receipt {
            transaction_hash: r.transaction_hash,
            block_number: r.block_number,
            success: r.status(),
        }))
    }

    async fn send(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        self.provider
            .raw_request::<_, serde_json::Value>(Cow::Owned(method.to_string()), params)
            .await
            .map_err(provider_err("raw request"))
    }
}

#[async_trait]
impl ChainReader for AlloyChain {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        IERC20View::new(token, &self.provider)
            .allowance(owner, spender)
            .call()
            .await
            .map_err(provider_err("allowance"))
    }

    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool> {
        IConditionalTokensView::new(self.contracts.conditional_tokens, &self.provider)
            .isApprovedForAll(owner, operator)
            .call()
            .await
            .map_err(provider_err("isApprovedForAll"))
    }

    async fn market_collateral(&self, market_maker: Address) -> Result<Address> {
        IFixedProductMarketMakerView::new(market_maker, &self.provider)
            .collateralToken()
            .call()
            .await
            .map_err(provider_err("collateralToken"))
    }

    async fn market_condition_id(&self, market_maker: Address) -> Result<B256> {
        IFixedProductMarketMakerView::new(market_maker, &self.provider)
            .conditionIds(U256::ZERO)
            .call()
            .await
            .map_err(provider_err("conditionIds"))
    }

    async fn calc_buy_amount(
        &self,
        market_maker: Address,
        investment: U256,
        outcome_index: usize,
    ) -> Result<U256> {
        IFixedProductMarketMakerView::new(market_maker, &self.provider)
            .calcBuyAmount(investment, U256::from(outcome_index))
            .call()
            .await
            .map_err(provider_err("calcBuyAmount"))
    }

    async fn calc_sell_amount(
        &self,
        market_maker: Address,
        return_amount: U256,
        outcome_index: usize,
    ) -> Result<U256> {
        IFixedProductMarketMakerView::new(market_maker, &self.provider)
            .calcSellAmount(return_amount, U256::from(outcome_index))
            .call()
            .await
            .map_err(provider_err("calcSellAmount"))
    }

    async fn condition_exists(&self, condition_id: B256) -> Result<bool> {
        let slots = IConditionalTokensView::new(self.contracts.conditional_tokens, &self.provider)
            .getOutcomeSlotCount(condition_id)
            .call()
            .await
            .map_err(provider_err("getOutcomeSlotCount"))?;
        Ok(!slots.is_zero())
    }

    async fn predict_market_maker(&self, seed: &MarketMakerSeed) -> Result<Address> {
        let factory = self.contracts.market_maker_factory;
        let implementation = IMarketMakerFactoryView::new(factory, &self.provider)
            .implementationMaster()
            .call()
            .await
            .map_err(provider_err("implementationMaster"))?;
        let predicted = market_maker_address(
            factory,
            implementation,
            self.contracts.conditional_tokens,
            seed,
        );
        debug!(%predicted, %implementation, "Predicted market maker address");
        Ok(predicted)
    }

    async fn claim_history(&self, question_id: B256) -> Result<Option<ClaimHistory>> {
        let realitio = IRealitioView::new(self.contracts.realitio, &self.provider);
        let head = realitio
            .getHistoryHash(question_id)
            .call()
            .await
            .map_err(provider_err("getHistoryHash"))?;
        if head == B256::ZERO {
            return Ok(None);
        }

        let filter = Filter::new()
            .address(self.contracts.realitio)
            .event_signature(IRealitioView::LogNewAnswer::SIGNATURE_HASH)
            .topic1(question_id)
            .from_block(0u64);
        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(provider_err("LogNewAnswer logs"))?;

        let mut answers = Vec::with_capacity(logs.len());
        for log in logs {
            let block = log.block_number.unwrap_or_default();
            let index = log.log_index.unwrap_or_default();
            let decoded = log
                .log_decode::<IRealitioView::LogNewAnswer>()
                .map_err(provider_err("LogNewAnswer decode"))?;
            answers.push((block, index, decoded.inner.data));
        }
        if answers.is_empty() {
            return Ok(None);
        }
        Ok(Some(claim_history_from(answers)))
    }

    async fn realitio_balance(&self, account: Address) -> Result<U256> {
        IRealitioView::new(self.contracts.realitio, &self.provider)
            .balanceOf(account)
            .call()
            .await
            .map_err(provider_err("realitio balanceOf"))
    }
}

//! Read-only chain queries used while composing pipelines.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::domain::market::ClaimHistory;
use crate::error::Result;

/// Parameters that determine a market maker's deterministic address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketMakerSeed {
    /// Account that calls the factory (the proxy).
    pub creator: Address,
    pub salt_nonce: U256,
    pub collateral: Address,
    pub condition_id: B256,
    /// Fee in 1e18 fixed point.
    pub fee: U256,
}

/// View calls against the market contracts.
///
/// Stages consult this port to decide which steps to emit; it never
/// changes state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// ERC-20 allowance of `owner` towards `spender`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Whether `operator` may move all of `owner`'s conditional tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool>;

    /// Collateral token of a market maker.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn market_collateral(&self, market_maker: Address) -> Result<Address>;

    /// First condition id of a market maker.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn market_condition_id(&self, market_maker: Address) -> Result<B256>;

    /// Outcome shares bought for `investment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn calc_buy_amount(
        &self,
        market_maker: Address,
        investment: U256,
        outcome_index: usize,
    ) -> Result<U256>;

    /// Outcome shares sold to receive `return_amount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn calc_sell_amount(
        &self,
        market_maker: Address,
        return_amount: U256,
        outcome_index: usize,
    ) -> Result<U256>;

    /// Whether the condition has been prepared.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn condition_exists(&self, condition_id: B256) -> Result<bool>;

    /// Address the factory will deploy a market maker at.
    ///
    /// # Errors
    ///
    /// Returns an error if the factory cannot be queried.
    async fn predict_market_maker(&self, seed: &MarketMakerSeed) -> Result<Address>;

    /// Unclaimed answer history of a question, or `None` if nothing is claimable.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs cannot be fetched.
    async fn claim_history(&self, question_id: B256) -> Result<Option<ClaimHistory>>;

    /// Realitio balance of `account` (bonds and winnings).
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn realitio_balance(&self, account: Address) -> Result<U256>;
}

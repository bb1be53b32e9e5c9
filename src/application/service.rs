//! Proxy transaction service: one method per user action.
//!
//! Every action has two entry points. `plan_*` composes the batch without
//! touching the chain beyond reads; the plain method composes, submits and
//! waits for confirmation while publishing status on a watch channel.

use alloy_primitives::{Address, B256, U256};
use tokio::sync::watch;

use super::pipeline::bridge::{BridgeApprove, BridgeToMainnet, BridgeToSidechain, UpgradeProxy};
use super::pipeline::funds::{Approve, Fee, Transfer, Unwrap, Withdraw, Wrap};
use super::pipeline::liquidity::{AddFunds, RemoveFunds};
use super::pipeline::market::{
    AnnounceCondition, CreateMarket, CreateQuestion, PrepareCondition, WrangleMarketData,
};
use super::pipeline::resolution::{
    ClaimWinnings, RedeemPosition, ResolveCondition, SubmitAnswer, WithdrawBond,
};
use super::pipeline::trade::{ApproveForAll, Buy, Sell};
use super::pipeline::{Pipeline, PipelineContext, PipelineOutcome, StageEnv};
use crate::domain::market::{MarketData, Question};
use crate::domain::status::TransactionStatus;
use crate::domain::token::Token;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone)]
pub struct BuyParams {
    /// Collateral to invest, before the relay fee.
    pub amount: U256,
    pub collateral: Token,
    pub outcome_index: usize,
    pub market_maker: Address,
}

#[derive(Debug, Clone)]
pub struct SellParams {
    /// Exact collateral to receive.
    pub amount: U256,
    pub outcome_index: usize,
    pub market_maker: Address,
}

#[derive(Debug, Clone)]
pub struct AddFundingParams {
    pub amount: U256,
    pub collateral: Token,
    pub market_maker: Address,
}

#[derive(Debug, Clone)]
pub struct RemoveFundingParams {
    pub market_maker: Address,
    pub shares_to_burn: U256,
    /// Full outcome sets merged back into collateral.
    pub amount_to_merge: U256,
    /// Accrued fees paid out alongside the merged collateral.
    pub earnings: U256,
    pub outcome_count: usize,
    /// Read from the market maker when absent.
    pub condition_id: Option<B256>,
}

#[derive(Debug, Clone)]
pub struct ResolveParams {
    pub question: Question,
    pub outcome_count: usize,
    /// Lower and upper bound for scalar markets.
    pub scalar_range: Option<(U256, U256)>,
}

#[derive(Debug, Clone)]
pub struct RedeemParams {
    pub resolve: ResolveParams,
    pub condition_resolved: bool,
    pub market_maker: Address,
    pub collateral: Token,
    pub earned_collateral: U256,
}

#[derive(Debug, Clone)]
pub struct SubmitAnswerParams {
    pub question_id: B256,
    pub answer: B256,
    pub bond: U256,
}

#[derive(Debug, Clone)]
pub struct BridgeParams {
    pub amount: U256,
    /// Token to move; `Address::ZERO` for the native asset.
    pub token: Address,
}

/// Facade over the proxy pipelines.
pub struct TransactionService {
    env: StageEnv,
}

impl TransactionService {
    #[must_use]
    pub fn new(env: StageEnv) -> Self {
        Self { env }
    }

    #[must_use]
    pub fn env(&self) -> &StageEnv {
        &self.env
    }

    /// Lifecycle of the most recent action.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<TransactionStatus> {
        self.env.status.subscribe()
    }

    /// Hash of the most recently submitted batch.
    #[must_use]
    pub fn tx_hash(&self) -> watch::Receiver<Option<B256>> {
        self.env.status.subscribe_hash()
    }

    async fn plan(&self, (pipeline, ctx): (Pipeline, PipelineContext)) -> Result<PipelineContext> {
        pipeline.compose(ctx, &self.env).await
    }

    async fn run(&self, (pipeline, ctx): (Pipeline, PipelineContext)) -> Result<PipelineOutcome> {
        pipeline.run(ctx, &self.env).await
    }

    // --- trading -------------------------------------------------------------

    fn buy(params: &BuyParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("buy_outcomes")
            .then(Fee)
            .then(Wrap)
            .then(Approve)
            .then(Transfer)
            .then(Buy);
        let ctx = PipelineContext::new()
            .with_amount(params.amount)
            .with_collateral(params.collateral.address)
            .with_spender(params.market_maker)
            .with_market_maker(params.market_maker)
            .with_outcome_index(params.outcome_index);
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_buy_outcomes(&self, params: &BuyParams) -> Result<PipelineContext> {
        self.plan(Self::buy(params)).await
    }

    /// Buy outcome shares: fee, wrap, approve, deposit, buy.
    ///
    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn buy_outcomes(&self, params: &BuyParams) -> Result<PipelineOutcome> {
        self.run(Self::buy(params)).await
    }

    fn sell(params: &SellParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("sell_outcomes")
            .then(ApproveForAll)
            .then(Sell)
            .then(Unwrap)
            .then(Withdraw);
        let ctx = PipelineContext::new()
            .with_amount(params.amount)
            .with_market_maker(params.market_maker)
            .with_outcome_index(params.outcome_index);
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_sell_outcomes(&self, params: &SellParams) -> Result<PipelineContext> {
        self.plan(Self::sell(params)).await
    }

    /// Sell shares for an exact collateral return and deliver it to the user.
    ///
    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn sell_outcomes(&self, params: &SellParams) -> Result<PipelineOutcome> {
        self.run(Self::sell(params)).await
    }

    // --- market creation ----------------------------------------------------

    fn create(market: &MarketData, scalar: bool) -> Result<(Pipeline, PipelineContext)> {
        if market.is_scalar() != scalar {
            let expected = if scalar { "scalar" } else { "categorical" };
            return Err(PipelineError::Unsupported(format!(
                "expected {expected} market data"
            ))
            .into());
        }
        let name = if scalar {
            "create_scalar_market"
        } else {
            "create_market"
        };
        let pipeline = Pipeline::new(name)
            .then(WrangleMarketData)
            .then(Wrap)
            .then(Approve)
            .then(Transfer)
            .then(CreateQuestion);
        let pipeline = if scalar {
            pipeline.then(AnnounceCondition)
        } else {
            pipeline
        };
        let pipeline = pipeline.then(PrepareCondition).then(CreateMarket);
        Ok((pipeline, PipelineContext::new().with_market(market.clone())))
    }

    /// # Errors
    ///
    /// Rejects scalar market data; otherwise returns the first stage error.
    pub async fn plan_create_market(&self, market: &MarketData) -> Result<PipelineContext> {
        self.plan(Self::create(market, false)?).await
    }

    /// Create and fund a binary or categorical market.
    ///
    /// # Errors
    ///
    /// Rejects scalar market data; otherwise returns stage, submission or
    /// confirmation errors.
    pub async fn create_market(&self, market: &MarketData) -> Result<PipelineOutcome> {
        self.run(Self::create(market, false)?).await
    }

    /// # Errors
    ///
    /// Rejects categorical market data; otherwise returns the first stage error.
    pub async fn plan_create_scalar_market(&self, market: &MarketData) -> Result<PipelineContext> {
        self.plan(Self::create(market, true)?).await
    }

    /// Create and fund a scalar market.
    ///
    /// # Errors
    ///
    /// Rejects categorical market data; otherwise returns stage, submission or
    /// confirmation errors.
    pub async fn create_scalar_market(&self, market: &MarketData) -> Result<PipelineOutcome> {
        self.run(Self::create(market, true)?).await
    }

    // --- liquidity ------------------------------------------------------------

    fn add(params: &AddFundingParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("add_funding")
            .then(Fee)
            .then(Wrap)
            .then(Approve)
            .then(Transfer)
            .then(AddFunds);
        let ctx = PipelineContext::new()
            .with_amount(params.amount)
            .with_collateral(params.collateral.address)
            .with_spender(params.market_maker)
            .with_market_maker(params.market_maker);
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_add_funding(&self, params: &AddFundingParams) -> Result<PipelineContext> {
        self.plan(Self::add(params)).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn add_funding(&self, params: &AddFundingParams) -> Result<PipelineOutcome> {
        self.run(Self::add(params)).await
    }

    fn remove(params: &RemoveFundingParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("remove_funding")
            .then(RemoveFunds {
                earnings: params.earnings,
            })
            .then(Unwrap)
            .then(Withdraw);
        let ctx = PipelineContext::new()
            .with_market_maker(params.market_maker)
            .with_shares(params.shares_to_burn)
            .with_amount(params.amount_to_merge)
            .with_outcome_count(params.outcome_count);
        let ctx = match params.condition_id {
            Some(id) => ctx.with_condition_id(id),
            None => ctx,
        };
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_remove_funding(&self, params: &RemoveFundingParams) -> Result<PipelineContext> {
        self.plan(Self::remove(params)).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn remove_funding(&self, params: &RemoveFundingParams) -> Result<PipelineOutcome> {
        self.run(Self::remove(params)).await
    }

    // --- resolution -----------------------------------------------------------

    fn resolution_context(params: &ResolveParams) -> PipelineContext {
        let ctx = PipelineContext::new()
            .with_question(params.question.clone())
            .with_outcome_count(params.outcome_count);
        match params.scalar_range {
            Some((lower, upper)) => ctx.with_scalar_range(lower, upper),
            None => ctx,
        }
    }

    fn redeem(params: &RedeemParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("redeem_positions")
            .then(ResolveCondition)
            .then(ClaimWinnings)
            .then(RedeemPosition)
            .then(Unwrap)
            .then(Withdraw)
            .then(WithdrawBond);
        let ctx = Self::resolution_context(&params.resolve)
            .with_condition_resolved(params.condition_resolved)
            .with_market_maker(params.market_maker)
            .with_collateral(params.collateral.address)
            .with_amount(params.earned_collateral);
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_redeem_positions(&self, params: &RedeemParams) -> Result<PipelineContext> {
        self.plan(Self::redeem(params)).await
    }

    /// Resolve if needed, redeem winnings and withdraw any Realitio balance.
    ///
    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn redeem_positions(&self, params: &RedeemParams) -> Result<PipelineOutcome> {
        self.run(Self::redeem(params)).await
    }

    fn resolve(params: &ResolveParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("resolve_condition")
            .then(ResolveCondition)
            .then(ClaimWinnings);
        (pipeline, Self::resolution_context(params))
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_resolve_condition(&self, params: &ResolveParams) -> Result<PipelineContext> {
        self.plan(Self::resolve(params)).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn resolve_condition(&self, params: &ResolveParams) -> Result<PipelineOutcome> {
        self.run(Self::resolve(params)).await
    }

    fn answer(params: &SubmitAnswerParams) -> (Pipeline, PipelineContext) {
        let pipeline = Pipeline::new("submit_answer").then(SubmitAnswer);
        let ctx = PipelineContext::new()
            .with_question_id(params.question_id)
            .with_answer(params.answer, params.bond);
        (pipeline, ctx)
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_submit_answer(&self, params: &SubmitAnswerParams) -> Result<PipelineContext> {
        self.plan(Self::answer(params)).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn submit_answer(&self, params: &SubmitAnswerParams) -> Result<PipelineOutcome> {
        self.run(Self::answer(params)).await
    }

    // --- proxy maintenance -----------------------------------------------------

    /// Whether the proxy is deployed and delegates to the configured implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy cannot be queried or no implementation
    /// is configured.
    pub async fn proxy_is_up_to_date(&self) -> Result<bool> {
        let target = self.env.contracts.require_proxy_implementation()?;
        if !self.env.proxy.is_deployed().await? {
            return Ok(false);
        }
        let current = self.env.proxy.master_copy().await?;
        Ok(current == target)
    }

    fn upgrade() -> (Pipeline, PipelineContext) {
        (
            Pipeline::new("upgrade_proxy_implementation").then(UpgradeProxy),
            PipelineContext::new(),
        )
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_upgrade_proxy_implementation(&self) -> Result<PipelineContext> {
        self.plan(Self::upgrade()).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn upgrade_proxy_implementation(&self) -> Result<PipelineOutcome> {
        self.run(Self::upgrade()).await
    }

    // --- bridging ---------------------------------------------------------------

    fn bridge_approval(token: Address) -> (Pipeline, PipelineContext) {
        (
            Pipeline::new("approve_for_bridge").then(BridgeApprove),
            PipelineContext::new().with_collateral(token),
        )
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_approve_for_bridge(&self, token: Address) -> Result<PipelineContext> {
        self.plan(Self::bridge_approval(token)).await
    }

    /// Approve the omni-bridge to move `token` out of the proxy.
    ///
    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn approve_for_bridge(&self, token: Address) -> Result<PipelineOutcome> {
        self.run(Self::bridge_approval(token)).await
    }

    fn to_mainnet(params: &BridgeParams) -> (Pipeline, PipelineContext) {
        (
            Pipeline::new("send_to_mainnet").then(BridgeToMainnet),
            PipelineContext::new()
                .with_amount(params.amount)
                .with_collateral(params.token),
        )
    }

    /// # Errors
    ///
    /// Rejects proxies that are not relayed; otherwise returns the first stage error.
    pub async fn plan_send_to_mainnet(&self, params: &BridgeParams) -> Result<PipelineContext> {
        self.plan(Self::to_mainnet(params)).await
    }

    /// # Errors
    ///
    /// Rejects proxies that are not relayed; otherwise returns stage,
    /// submission or confirmation errors.
    pub async fn send_to_mainnet(&self, params: &BridgeParams) -> Result<PipelineOutcome> {
        self.run(Self::to_mainnet(params)).await
    }

    fn to_sidechain(&self, params: &BridgeParams) -> Result<(Pipeline, PipelineContext)> {
        let bridge = self.env.contracts.require_foreign_bridge()?;
        let pipeline = Pipeline::new("send_to_sidechain")
            .then(Approve)
            .then(Transfer)
            .then(BridgeToSidechain);
        let ctx = PipelineContext::new()
            .with_amount(params.amount)
            .with_collateral(params.token)
            .with_spender(bridge);
        Ok((pipeline, ctx))
    }

    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn plan_send_to_sidechain(&self, params: &BridgeParams) -> Result<PipelineContext> {
        self.plan(self.to_sidechain(params)?).await
    }

    /// # Errors
    ///
    /// Returns stage, submission or confirmation errors.
    pub async fn send_to_sidechain(&self, params: &BridgeParams) -> Result<PipelineOutcome> {
        self.run(self.to_sidechain(params)?).await
    }
}

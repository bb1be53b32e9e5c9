//! Buy and sell stages against a market maker.

use async_trait::async_trait;
use tracing::debug;

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls;
use crate::error::Result;

/// Buys outcome shares, requiring at least the currently quoted amount.
pub struct Buy;

#[async_trait]
impl Stage for Buy {
    fn name(&self) -> &'static str {
        "buy"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let market_maker = ctx.require_market_maker()?;
        let outcome_index = ctx.require_outcome_index()?;
        let amount = ctx.require_amount()?;

        let min_shares = env
            .chain
            .calc_buy_amount(market_maker, amount, outcome_index)
            .await?;
        debug!(%market_maker, outcome_index, %amount, %min_shares, "Quoted buy");
        Ok(ctx.with_step(calls::buy(market_maker, amount, outcome_index, min_shares)))
    }
}

/// Lets the market maker move the proxy's outcome shares.
pub struct ApproveForAll;

#[async_trait]
impl Stage for ApproveForAll {
    fn name(&self) -> &'static str {
        "approve_for_all"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let proxy = ctx.facts()?.proxy;
        let market_maker = ctx.require_market_maker()?;
        if env.chain.is_approved_for_all(proxy, market_maker).await? {
            return Ok(ctx);
        }
        Ok(ctx.with_step(calls::set_approval_for_all(
            env.contracts.conditional_tokens,
            market_maker,
        )))
    }
}

/// Sells shares for an exact collateral return.
///
/// The returned collateral becomes the proceeds delivered by later stages.
pub struct Sell;

#[async_trait]
impl Stage for Sell {
    fn name(&self) -> &'static str {
        "sell"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let market_maker = ctx.require_market_maker()?;
        let outcome_index = ctx.require_outcome_index()?;
        let amount = ctx.require_amount()?;

        let max_shares = env
            .chain
            .calc_sell_amount(market_maker, amount, outcome_index)
            .await?;
        let collateral = match ctx.collateral() {
            Some(collateral) => collateral,
            None => env.chain.market_collateral(market_maker).await?,
        };
        debug!(%market_maker, outcome_index, %amount, %max_shares, "Quoted sell");
        Ok(ctx
            .with_step(calls::sell(market_maker, amount, outcome_index, max_shares))
            .with_collateral(collateral)
            .with_proceeds(amount))
    }
}

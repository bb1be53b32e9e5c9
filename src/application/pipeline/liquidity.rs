//! Liquidity stages: add and remove pool funding.

use alloy_primitives::U256;
use async_trait::async_trait;

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls;
use crate::error::Result;

/// Adds funding at the pool's current odds.
pub struct AddFunds;

#[async_trait]
impl Stage for AddFunds {
    fn name(&self) -> &'static str {
        "add_funds"
    }

    async fn apply(&self, ctx: PipelineContext, _env: &StageEnv) -> Result<PipelineContext> {
        let market_maker = ctx.require_market_maker()?;
        let amount = ctx.require_amount()?;
        Ok(ctx.with_step(calls::add_funding(market_maker, amount)))
    }
}

/// Burns pool shares and merges the returned outcome sets into collateral.
///
/// The merged amount plus `earnings` (accrued fees) become the proceeds.
pub struct RemoveFunds {
    pub earnings: U256,
}

#[async_trait]
impl Stage for RemoveFunds {
    fn name(&self) -> &'static str {
        "remove_funds"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let market_maker = ctx.require_market_maker()?;
        let shares = ctx.require_shares()?;
        let amount_to_merge = ctx.require_amount()?;
        let outcome_count = ctx.require_outcome_count()?;

        let condition_id = match ctx.condition_id() {
            Some(id) => id,
            None => env.chain.market_condition_id(market_maker).await?,
        };
        let collateral = match ctx.collateral() {
            Some(collateral) => collateral,
            None => env.chain.market_collateral(market_maker).await?,
        };

        Ok(ctx
            .with_step(calls::remove_funding(market_maker, shares))
            .with_step(calls::merge_positions(
                env.contracts.conditional_tokens,
                collateral,
                condition_id,
                outcome_count,
                amount_to_merge,
            ))
            .with_collateral(collateral)
            .with_condition_id(condition_id)
            .with_proceeds(amount_to_merge + self.earnings))
    }
}

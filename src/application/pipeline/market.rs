//! Market creation stages: question, condition and market maker.

use alloy_primitives::U256;
use async_trait::async_trait;
use tracing::{debug, info};

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls::{self, CreateMarketArgs};
use crate::domain::condition::{derive_market_ids, encode_question_text};
use crate::domain::fixed::fee_to_wad;
use crate::error::Result;
use crate::port::MarketMakerSeed;

/// Validates the market and derives its ids, amount and spender.
pub struct WrangleMarketData;

#[async_trait]
impl Stage for WrangleMarketData {
    fn name(&self) -> &'static str {
        "wrangle_market_data"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let proxy = ctx.facts()?.proxy;
        let market = ctx.require_market()?;
        market.validate()?;

        let oracle = if market.is_scalar() {
            env.contracts.require_scalar_adapter()?
        } else {
            env.contracts.oracle
        };
        let ids = derive_market_ids(market, proxy, oracle);
        let salt_nonce = market
            .salt_nonce
            .unwrap_or_else(|| U256::from(rand::random::<u64>()));
        let funding = market.funding;
        let collateral = market.collateral.address;
        let outcome_count = market.outcome_slot_count();
        let range = market.bounds().map(|b| (b.lower(), b.upper()));

        info!(
            question_id = %ids.question_id,
            condition_id = %ids.condition_id,
            outcomes = outcome_count,
            "Market data prepared"
        );

        let ctx = ctx
            .with_amount(funding)
            .with_collateral(collateral)
            .with_spender(env.contracts.market_maker_factory)
            .with_outcome_count(outcome_count)
            .with_question_id(ids.question_id)
            .with_condition_question_id(ids.condition_question_id)
            .with_condition_id(ids.condition_id)
            .with_salt_nonce(salt_nonce);
        Ok(match range {
            Some((lower, upper)) => ctx.with_scalar_range(lower, upper),
            None => ctx,
        })
    }
}

/// Asks the Realitio question backing the market.
pub struct CreateQuestion;

#[async_trait]
impl Stage for CreateQuestion {
    fn name(&self) -> &'static str {
        "create_question"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        ctx.require_question_id()?;
        let market = ctx.require_market()?;
        let step = calls::ask_question(
            env.contracts.realitio,
            market.template_id(),
            encode_question_text(market),
            market.arbitrator,
            market.timeout,
            market.opening_ts,
            market.nonce,
        );
        Ok(ctx.with_step(step))
    }
}

/// Announces a scalar question's bounds to the scalar adapter.
pub struct AnnounceCondition;

#[async_trait]
impl Stage for AnnounceCondition {
    fn name(&self) -> &'static str {
        "announce_condition"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let Some((lower, upper)) = ctx.scalar_range() else {
            return Ok(ctx);
        };
        let question_id = ctx.require_question_id()?;
        Ok(ctx.with_step(calls::announce_condition(
            env.contracts.require_scalar_adapter()?,
            question_id,
            lower,
            upper,
        )))
    }
}

/// Prepares the condition unless it already exists.
pub struct PrepareCondition;

#[async_trait]
impl Stage for PrepareCondition {
    fn name(&self) -> &'static str {
        "prepare_condition"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let condition_id = ctx.require_condition_id()?;
        if env.chain.condition_exists(condition_id).await? {
            debug!(%condition_id, "Condition already prepared");
            return Ok(ctx);
        }
        let oracle = if ctx.scalar_range().is_some() {
            env.contracts.require_scalar_adapter()?
        } else {
            env.contracts.oracle
        };
        let step = calls::prepare_condition(
            env.contracts.conditional_tokens,
            oracle,
            ctx.require_condition_question_id()?,
            ctx.require_outcome_count()?,
        );
        Ok(ctx.with_step(step))
    }
}

/// Deploys the market maker through the factory, funding it in the same call.
pub struct CreateMarket;

#[async_trait]
impl Stage for CreateMarket {
    fn name(&self) -> &'static str {
        "create_market"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let proxy = ctx.facts()?.proxy;
        let market = ctx.require_market()?;
        let fee = fee_to_wad(market.fee)?;
        let distribution_hint = market.distribution_hint()?;
        let collateral = ctx.require_collateral()?;
        let condition_id = ctx.require_condition_id()?;
        let salt_nonce = ctx.require_salt_nonce()?;
        let amount = ctx.require_amount()?;

        let seed = MarketMakerSeed {
            creator: proxy,
            salt_nonce,
            collateral,
            condition_id,
            fee,
        };
        let predicted = env.chain.predict_market_maker(&seed).await?;
        info!(market_maker = %predicted, "Predicted market maker address");

        let step = calls::create_market(
            env.contracts.market_maker_factory,
            CreateMarketArgs {
                salt_nonce,
                conditional_tokens: env.contracts.conditional_tokens,
                collateral,
                condition_id,
                fee,
                initial_funds: amount,
                distribution_hint,
            },
        );
        Ok(ctx.with_step(step).with_predicted_market_maker(predicted))
    }
}

//! Resolution stages: report answers, claim, redeem and withdraw bonds.

use async_trait::async_trait;
use tracing::debug;

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls;
use crate::error::Result;

/// Reports the Realitio answer to the conditional tokens contract.
///
/// Skipped when the condition is already resolved. Scalar markets resolve
/// through the scalar adapter, everything else through the oracle proxy.
pub struct ResolveCondition;

#[async_trait]
impl Stage for ResolveCondition {
    fn name(&self) -> &'static str {
        "resolve_condition"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        if ctx.condition_resolved() {
            return Ok(ctx);
        }
        let question = ctx.require_question()?;
        let step = match ctx.scalar_range() {
            Some((lower, upper)) => calls::resolve_scalar_condition(
                env.contracts.require_scalar_adapter()?,
                question.id,
                question.raw.clone(),
                lower,
                upper,
            ),
            None => calls::resolve_condition(
                env.contracts.oracle,
                question.id,
                question.template_id,
                question.raw.clone(),
                ctx.require_outcome_count()?,
            ),
        };
        Ok(ctx.with_step(step))
    }
}

/// Claims Realitio winnings when an unclaimed answer history exists.
pub struct ClaimWinnings;

#[async_trait]
impl Stage for ClaimWinnings {
    fn name(&self) -> &'static str {
        "claim_winnings"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        if ctx.condition_resolved() {
            return Ok(ctx);
        }
        let question_id = ctx.require_question()?.id;
        match env.chain.claim_history(question_id).await? {
            Some(history) if !history.is_empty() => Ok(ctx.with_step(calls::claim_winnings(
                env.contracts.realitio,
                question_id,
                &history,
            ))),
            _ => {
                debug!(%question_id, "Nothing to claim");
                Ok(ctx)
            }
        }
    }
}

/// Redeems winning positions; the earned collateral becomes the proceeds.
pub struct RedeemPosition;

#[async_trait]
impl Stage for RedeemPosition {
    fn name(&self) -> &'static str {
        "redeem_position"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let earned = ctx.require_amount()?;
        if earned.is_zero() {
            return Ok(ctx);
        }
        let market_maker = ctx.require_market_maker()?;
        let collateral = ctx.require_collateral()?;
        let outcome_count = ctx.require_outcome_count()?;
        let condition_id = match ctx.condition_id() {
            Some(id) => id,
            None => env.chain.market_condition_id(market_maker).await?,
        };

        Ok(ctx
            .with_step(calls::redeem_positions(
                env.contracts.conditional_tokens,
                collateral,
                condition_id,
                outcome_count,
            ))
            .with_condition_id(condition_id)
            .with_proceeds(earned))
    }
}

/// Withdraws the proxy's Realitio balance and forwards it to the user.
pub struct WithdrawBond;

#[async_trait]
impl Stage for WithdrawBond {
    fn name(&self) -> &'static str {
        "withdraw_bond"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let facts = ctx.facts()?;
        let balance = env.chain.realitio_balance(facts.proxy).await?;
        if balance.is_zero() {
            return Ok(ctx);
        }
        let ctx = ctx.with_step(calls::withdraw_bond(env.contracts.realitio));
        if facts.mode.holds_funds() {
            return Ok(ctx);
        }
        Ok(ctx.with_step(calls::deliver_native(facts.account, balance)))
    }
}

/// Posts an answer with its bond.
pub struct SubmitAnswer;

#[async_trait]
impl Stage for SubmitAnswer {
    fn name(&self) -> &'static str {
        "submit_answer"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let facts = ctx.facts()?;
        let question_id = ctx.require_question_id()?;
        let answer = ctx.require_answer()?;
        let bond = ctx.require_bond()?;

        let ctx = ctx.with_step(calls::submit_answer(
            env.contracts.realitio,
            question_id,
            answer,
            bond,
        ));
        if facts.mode.holds_funds() {
            return Ok(ctx);
        }
        Ok(ctx.with_value(bond))
    }
}

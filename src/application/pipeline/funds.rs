//! Stages that move collateral between the user, the proxy and spenders.

use async_trait::async_trait;
use tracing::debug;

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls;
use crate::domain::token::NATIVE_ASSET;
use crate::error::{PipelineError, Result};

/// Deducts the relay fee from the amount when a relay sponsors gas.
pub struct Fee;

#[async_trait]
impl Stage for Fee {
    fn name(&self) -> &'static str {
        "fee"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        if !ctx.facts()?.mode.relay {
            return Ok(ctx);
        }
        let amount = ctx.require_amount()?;
        let fee = env.relay.info().await?.fee;
        let net = amount
            .checked_sub(fee)
            .ok_or(PipelineError::AmountBelowFee { amount, fee })?;
        debug!(%amount, %fee, %net, "Relay fee deducted");
        Ok(ctx.with_amount(net))
    }
}

/// Wraps the native asset so it can be used as ERC-20 collateral.
pub struct Wrap;

#[async_trait]
impl Stage for Wrap {
    fn name(&self) -> &'static str {
        "wrap"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        if ctx.require_collateral()? != NATIVE_ASSET {
            return Ok(ctx);
        }
        let amount = ctx.require_amount()?;
        let wrapped = env.contracts.wrapped_native;
        Ok(ctx
            .with_step(calls::wrap(wrapped, amount))
            .with_collateral(wrapped)
            .with_native_deposit())
    }
}

/// Approves the spender for unlimited collateral when the proxy's allowance
/// does not cover the amount.
pub struct Approve;

#[async_trait]
impl Stage for Approve {
    fn name(&self) -> &'static str {
        "approve"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let proxy = ctx.facts()?.proxy;
        let token = ctx.require_collateral()?;
        let spender = ctx.require_spender()?;
        let amount = ctx.require_amount()?;

        let allowance = env.chain.allowance(token, proxy, spender).await?;
        if allowance >= amount {
            debug!(%token, %spender, %allowance, "Allowance already sufficient");
            return Ok(ctx);
        }
        Ok(ctx.with_step(calls::approve_unlimited(token, spender)))
    }
}

/// Deposits the user's funds into the proxy.
///
/// ERC-20 collateral is pulled with `transferFrom`; the native asset rides
/// along as the batch value. Skipped when the proxy holds the funds itself.
pub struct Transfer;

#[async_trait]
impl Stage for Transfer {
    fn name(&self) -> &'static str {
        "transfer"
    }

    async fn apply(&self, ctx: PipelineContext, _env: &StageEnv) -> Result<PipelineContext> {
        let facts = ctx.facts()?;
        if facts.mode.holds_funds() {
            return Ok(ctx);
        }
        let amount = ctx.require_amount()?;
        if ctx.native_deposit() {
            return Ok(ctx.with_value(amount));
        }
        let token = ctx.require_collateral()?;
        Ok(ctx.with_step(calls::transfer_from(token, facts.account, facts.proxy, amount)))
    }
}

/// Unwraps proceeds held in the wrapped native token.
pub struct Unwrap;

#[async_trait]
impl Stage for Unwrap {
    fn name(&self) -> &'static str {
        "unwrap"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let Some(proceeds) = ctx.proceeds().filter(|p| !p.is_zero()) else {
            return Ok(ctx);
        };
        let collateral = ctx.require_collateral()?;
        if collateral != env.contracts.wrapped_native {
            return Ok(ctx);
        }
        Ok(ctx
            .with_step(calls::unwrap(collateral, proceeds))
            .with_native_delivery())
    }
}

/// Delivers proceeds from the proxy to the user's account.
pub struct Withdraw;

#[async_trait]
impl Stage for Withdraw {
    fn name(&self) -> &'static str {
        "withdraw"
    }

    async fn apply(&self, ctx: PipelineContext, _env: &StageEnv) -> Result<PipelineContext> {
        let facts = ctx.facts()?;
        if facts.mode.holds_funds() {
            return Ok(ctx);
        }
        let Some(proceeds) = ctx.proceeds().filter(|p| !p.is_zero()) else {
            return Ok(ctx);
        };
        let step = if ctx.deliver_native() {
            calls::deliver_native(facts.account, proceeds)
        } else {
            calls::deliver_token(ctx.require_collateral()?, facts.account, proceeds)
        };
        Ok(ctx.with_step(step))
    }
}

//! Cross-chain moves and proxy maintenance.

use async_trait::async_trait;

use super::context::PipelineContext;
use super::env::StageEnv;
use super::stage::Stage;
use crate::domain::calls;
use crate::domain::token::NATIVE_ASSET;
use crate::error::{PipelineError, Result};

/// Points the proxy at the configured implementation.
pub struct UpgradeProxy;

#[async_trait]
impl Stage for UpgradeProxy {
    fn name(&self) -> &'static str {
        "upgrade_proxy"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let proxy = ctx.facts()?.proxy;
        let implementation = env.contracts.require_proxy_implementation()?;
        Ok(ctx.with_step(calls::change_master_copy(proxy, implementation)))
    }
}

/// Unlimited approval of the omni-bridge for a token.
pub struct BridgeApprove;

#[async_trait]
impl Stage for BridgeApprove {
    fn name(&self) -> &'static str {
        "bridge_approve"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let token = ctx.require_collateral()?;
        Ok(ctx.with_step(calls::approve_unlimited(token, env.contracts.omni_bridge)))
    }
}

/// Sends sidechain funds held by a relayed proxy back to the signer on mainnet.
///
/// The native asset goes through the native bridge; tokens through the
/// omni-bridge with the receiver encoded in the transfer data.
pub struct BridgeToMainnet;

#[async_trait]
impl Stage for BridgeToMainnet {
    fn name(&self) -> &'static str {
        "bridge_to_mainnet"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let facts = ctx.facts()?;
        if !facts.mode.relay {
            return Err(PipelineError::Unsupported(
                "bridging to mainnet requires a relayed proxy".to_string(),
            )
            .into());
        }
        let amount = ctx.require_amount()?;
        let token = ctx.require_collateral()?;
        let step = if token == NATIVE_ASSET {
            calls::relay_native(env.contracts.native_bridge, facts.account, amount)
        } else {
            calls::relay_token(token, env.contracts.omni_bridge, facts.account, amount)
        };
        Ok(ctx.with_step(step))
    }
}

/// Relays tokens deposited in the proxy to the same proxy on the sidechain.
pub struct BridgeToSidechain;

#[async_trait]
impl Stage for BridgeToSidechain {
    fn name(&self) -> &'static str {
        "bridge_to_sidechain"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let bridge = env.contracts.require_foreign_bridge()?;
        let proxy = ctx.facts()?.proxy;
        let amount = ctx.require_amount()?;
        Ok(ctx.with_step(calls::relay_foreign(
            bridge,
            proxy,
            proxy,
            amount,
        )))
    }
}

//! Stage abstraction and the orchestrator that runs stages in order.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info};

use super::context::{PipelineContext, SetupFacts};
use super::env::StageEnv;
use crate::domain::calls;
use crate::domain::status::TransactionStatus;
use crate::domain::transaction::Confirmation;
use crate::error::Result;

/// One composable transformation of a [`PipelineContext`].
///
/// Stages append steps and record intermediate values. They may read the
/// chain but never submit anything.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error when an input is missing or a chain read fails; the
    /// pipeline aborts without submitting.
    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext>;
}

/// Gathers account, chain id, proxy address and mode. Always first.
pub struct Setup;

#[async_trait]
impl Stage for Setup {
    fn name(&self) -> &'static str {
        "setup"
    }

    async fn apply(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        let facts = SetupFacts {
            account: env.wallet.signer_address(),
            chain_id: env.wallet.chain_id().await?,
            proxy: env.proxy.address(),
            mode: env.proxy.mode(),
        };
        let ctx = ctx.with_facts(facts);
        if facts.mode.holds_funds() {
            return Ok(ctx.with_gas(env.default_gas));
        }
        Ok(ctx)
    }
}

/// Result of a submitted pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    pub confirmation: Confirmation,
    pub predicted_market_maker: Option<Address>,
    pub question_id: Option<B256>,
    pub condition_id: Option<B256>,
}

/// Terminal stage: submits the composed batch and waits for confirmation.
pub struct Exec;

impl Exec {
    /// # Errors
    ///
    /// Returns submission, revert or polling errors. The status board ends
    /// in `Error` in that case.
    pub async fn submit(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineOutcome> {
        let result = self.submit_inner(ctx, env).await;
        if result.is_err() {
            env.status.advance(TransactionStatus::Error);
        }
        result
    }

    async fn submit_inner(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineOutcome> {
        let facts = ctx.facts()?;
        let predicted_market_maker = ctx.predicted_market_maker();
        let question_id = ctx.question_id();
        let condition_id = ctx.condition_id();

        let ctx = if facts.mode.relay {
            let relay = env.relay.info().await?;
            ctx.with_step(calls::relay_fee(relay.address, relay.fee))
        } else {
            ctx
        };

        let (steps, options) = ctx.into_batch();
        env.status.advance(TransactionStatus::WaitingConfirmation);
        let submission = env.proxy.exec_transactions(&steps, &options).await?;

        env.status.advance(TransactionStatus::TransactionSubmitted);
        env.status.set_hash(submission.hash);
        info!(
            steps = steps.len(),
            hash = ?submission.hash,
            safe_tx_hash = ?submission.safe_tx_hash,
            "Batch submitted"
        );

        let confirmation = env.tracker.wait(&submission).await?;
        env.status.advance(TransactionStatus::TransactionConfirmed);
        if let Some(receipt) = confirmation.receipt() {
            info!(hash = %receipt.transaction_hash, block = ?receipt.block_number, "Batch confirmed");
        }

        Ok(PipelineOutcome {
            confirmation,
            predicted_market_maker,
            question_id,
            condition_id,
        })
    }
}

/// Ordered list of stages run as `setup, stages..., exec`.
pub struct Pipeline {
    name: &'static str,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stages: vec![Box::new(Setup)],
        }
    }

    #[must_use]
    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in sequence without submitting.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn compose(&self, mut ctx: PipelineContext, env: &StageEnv) -> Result<PipelineContext> {
        for stage in &self.stages {
            ctx = match stage.apply(ctx, env).await {
                Ok(next) => next,
                Err(e) => {
                    error!(pipeline = self.name, stage = stage.name(), error = %e, "Pipeline aborted");
                    return Err(e);
                }
            };
            debug!(
                pipeline = self.name,
                stage = stage.name(),
                steps = ctx.steps().len(),
                "Stage applied"
            );
        }
        Ok(ctx)
    }

    /// Compose, then submit the batch through [`Exec`].
    ///
    /// # Errors
    ///
    /// Returns the first stage error, or a submission or confirmation error.
    pub async fn run(&self, ctx: PipelineContext, env: &StageEnv) -> Result<PipelineOutcome> {
        info!(pipeline = self.name, stages = ?self.stage_names(), "Running pipeline");
        env.status.reset();
        let ctx = match self.compose(ctx, env).await {
            Ok(ctx) => ctx,
            Err(e) => {
                env.status.advance(TransactionStatus::Error);
                return Err(e);
            }
        };
        Exec.submit(ctx, env).await.map_err(|e| {
            error!(pipeline = self.name, error = %e, "Submission failed");
            e
        })
    }
}

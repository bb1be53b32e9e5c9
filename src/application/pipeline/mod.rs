//! Transaction pipelines: composable stages producing one atomic batch.

pub mod bridge;
pub mod context;
pub mod env;
pub mod funds;
pub mod liquidity;
pub mod market;
pub mod resolution;
pub mod stage;
pub mod trade;

pub use context::{PipelineContext, SetupFacts};
pub use env::{Contracts, StageEnv, StatusBoard};
pub use stage::{Exec, Pipeline, PipelineOutcome, Setup, Stage};

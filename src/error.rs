use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while sending a batch or reading its result.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("transaction {hash} reverted")]
    Reverted { hash: String },

    #[error("failed to sign: {0}")]
    Signing(String),
}

/// Errors raised while waiting for confirmation.
#[derive(Error, Debug)]
pub enum PollingError {
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: &'static str, waited: Duration },

    /// A single failed attempt. Logged and retried, never returned by the tracker.
    #[error("poll attempt failed: {0}")]
    Transient(String),
}

/// Errors raised while composing a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage ran before the stage producing its input.
    #[error("pipeline input missing: {0}")]
    MissingInput(&'static str),

    #[error("amount {amount} does not cover the relay fee {fee}")]
    AmountBelowFee {
        amount: alloy_primitives::U256,
        fee: alloy_primitives::U256,
    },

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Polling(#[from] PollingError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

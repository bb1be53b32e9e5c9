//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`]: `FakeChain`, one scriptable fake behind every outbound port.
//! - [`domain`]: Builders for tokens, contract sets and market data.
//! - [`config`]: Canonical TOML configurations.

pub mod chain;
pub mod config;
pub mod domain;

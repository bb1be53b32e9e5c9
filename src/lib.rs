//! ctfpipe - transaction pipelines for conditional-token prediction markets.
//!
//! User actions on a prediction market (buy, sell, create, fund, resolve,
//! redeem, bridge) are composed from small stages into one atomic batch that
//! a smart-contract proxy executes. The crate also carries the market maker
//! math used to quote those actions and a tracker that follows a submitted
//! batch until it is mined and indexed.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types and trading math: prices, trades, funding,
//!   condition ids and calldata encoders. No I/O.
//! - [`port`] - Traits for the node, the proxy and off-chain services.
//! - [`application`] - Pipeline stages, the transaction service and the
//!   confirmation tracker, written against ports only.
//! - [`adapter`] - alloy chain access, the Safe proxy executor, reqwest
//!   clients and the CLI.
//! - [`infrastructure`] - Configuration and wiring of adapters into a
//!   [`application::service::TransactionService`].
//!
//! # Example
//!
//! ```
//! use alloy_primitives::U256;
//! use ctfpipe::domain::pricing::calc_price;
//!
//! let prices = calc_price(&[U256::from(150), U256::from(50)]);
//! assert!((prices[0] - 0.25).abs() < 1e-9);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

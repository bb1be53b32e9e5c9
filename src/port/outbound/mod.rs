//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the node, the proxy account, and the off-chain
//! services a pipeline talks to.

pub mod chain;
pub mod offchain;
pub mod provider;
pub mod proxy;

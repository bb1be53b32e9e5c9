//! Outbound adapters (driven side): the node, the Safe proxy and HTTP services.

pub mod chain;
pub mod http;

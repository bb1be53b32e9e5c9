//! HTTP clients for off-chain services (reqwest).

pub mod relay;
pub mod safe_service;
pub mod subgraph;

pub use relay::{NoRelay, RelayClient};
pub use safe_service::SafeTxServiceClient;
pub use subgraph::SubgraphClient;

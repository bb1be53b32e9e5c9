//! On-chain adapters built on alloy.

pub mod contracts;
pub mod rpc;
pub mod safe;

pub use rpc::{AlloyChain, ReaderContracts};
pub use safe::OwnedSafeProxy;

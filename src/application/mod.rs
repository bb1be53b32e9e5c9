//! Application layer: pipelines, the transaction service facade and
//! confirmation tracking.

pub mod pipeline;
pub mod service;
pub mod tracker;

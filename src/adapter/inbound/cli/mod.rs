//! CLI module graph.

pub mod batch;
pub mod command;
pub mod config;
pub mod math;
pub mod output;
pub mod proxy;
pub mod run;
pub mod trade;

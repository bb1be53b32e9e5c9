//! Infrastructure configuration modules.

pub mod logging;
pub mod market;
pub mod network;
pub mod proxy;
pub mod service;
pub mod settings;
pub mod wallet;

//! Canonical test configurations.
//!
//! Single source of truth for TOML used across config and bootstrap tests.

/// Smallest configuration that passes validation.
pub const MINIMAL_TOML: &str = r#"
[network]
chain_id = 100
rpc_url = "http://localhost:8545"

[contracts]
conditional_tokens = "0x1111111111111111111111111111111111111111"
market_maker_factory = "0x2222222222222222222222222222222222222222"
realitio = "0x3333333333333333333333333333333333333333"
oracle = "0x4444444444444444444444444444444444444444"
wrapped_native = "0x5555555555555555555555555555555555555555"
multisend = "0x6666666666666666666666666666666666666666"
"#;

/// Minimal configuration plus proxy and service endpoints, enough to build
/// a transaction service.
pub fn full_toml() -> String {
    format!(
        r#"{MINIMAL_TOML}
[proxy]
address = "0x7777777777777777777777777777777777777777"

[services]
subgraph_url = "http://localhost:8000/subgraphs/name/omen"
safe_tx_service_url = "http://localhost:8001"
"#
    )
}

/// Minimal configuration with extra TOML appended.
pub fn minimal_with(extra: &str) -> String {
    format!("{MINIMAL_TOML}\n{extra}\n")
}

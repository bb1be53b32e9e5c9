//! Handlers for the `config` command group.

use std::path::Path;

use alloy_primitives::Address;
use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load the configuration and start logging, as every live command does.
///
/// # Errors
///
/// Returns read, parse or validation errors.
pub fn load(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config.init_logging();
    Ok(config)
}

fn address_or_unset(address: Address) -> String {
    if address == Address::ZERO {
        output::muted("(unset)")
    } else {
        address.to_string()
    }
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let mode = config.proxy.mode();

    if output::is_json() {
        output::result(
            "config",
            &json!({
                "chain_id": config.network.chain_id,
                "rpc_url": config.network.rpc_url,
                "proxy": config.proxy.address,
                "mode": mode,
                "fee": config.market.fee,
                "polling_interval_ms": config.polling.interval_ms,
                "polling_timeout_secs": config.polling.timeout_secs,
                "default_gas": config.execution.default_gas,
                "wallet_loaded": config.wallet.private_key.is_some(),
            }),
        );
        return Ok(());
    }

    output::section("Network");
    output::field("Chain ID", config.network.chain_id);
    output::field("RPC", &config.network.rpc_url);

    output::section("Contracts");
    let contracts = &config.contracts;
    output::field("Conditional", contracts.conditional_tokens);
    output::field("Factory", contracts.market_maker_factory);
    output::field("Realitio", contracts.realitio);
    output::field("Oracle", contracts.oracle);
    output::field("Scalar adapter", address_or_unset(contracts.scalar_adapter));
    output::field("Wrapped native", contracts.wrapped_native);
    output::field("MultiSend", contracts.multisend);
    output::field("Safe impl", address_or_unset(contracts.proxy_implementation));

    output::section("Proxy");
    output::field("Address", address_or_unset(config.proxy.address));
    output::field("Relay", mode.relay);
    output::field("Safe UI", mode.connected_to_safe);
    output::field("Safe app", mode.safe_app);

    output::section("Market Defaults");
    output::field("Fee", format!("{}%", config.market.fee * rust_decimal::Decimal::ONE_HUNDRED));
    output::field("Timeout", format!("{}s", config.market.timeout_secs));
    output::field("Language", &config.market.language);

    output::section("Confirmation");
    output::field("Interval", format!("{}ms", config.polling.interval_ms));
    if config.polling.timeout_secs == 0 {
        output::field("Timeout", "unbounded");
    } else {
        output::field("Timeout", format!("{}s", config.polling.timeout_secs));
    }
    output::field("Default gas", config.execution.default_gas);

    output::section("Wallet");
    if config.wallet.private_key.is_some() {
        output::success("Private key loaded from WALLET_PRIVATE_KEY");
    } else {
        output::warning("Private key not set");
    }
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config = Config::load(path)?;
    output::success("Config file is valid");

    let mut warnings = Vec::new();
    if config.proxy.address == Address::ZERO {
        warnings.push("proxy.address is unset: live commands will fail");
    }
    if config.wallet.private_key.is_none() {
        warnings.push("WALLET_PRIVATE_KEY is unset: live commands will fail");
    }
    if config.contracts.proxy_implementation == Address::ZERO {
        warnings.push("contracts.proxy_implementation is unset: proxy upgrades are disabled");
    }
    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in warnings {
            output::warning(warning);
        }
    }

    output::field("Next", format!("ctfpipe config show -c {}", path.display()));
    Ok(())
}

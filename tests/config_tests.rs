//! Loading configuration from disk and wiring the service from it.

use std::io::Write;

use ctfpipe::error::{ConfigError, Error};
use ctfpipe::infrastructure::bootstrap::build_service;
use ctfpipe::infrastructure::config::settings::Config;
use ctfpipe::testkit::config::{full_toml, minimal_with, MINIMAL_TOML};
use tempfile::NamedTempFile;

// Well-known development key; never funded on a real network.
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_full_config_from_disk() {
    let file = write_config(&full_toml());

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.network.chain_id, 100);
    assert_eq!(
        config.proxy.address.to_string().to_lowercase(),
        "0x7777777777777777777777777777777777777777"
    );
    assert_eq!(config.services.safe_tx_service_url, "http://localhost:8001");
    assert!(config.services.relay_url.is_none());
}

#[test]
fn shipped_example_config_is_valid() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml")).unwrap();

    assert!(!config.proxy.mode().holds_funds());
    assert_eq!(config.polling.interval_ms, 2_000);
    assert_ne!(config.contracts.scalar_adapter, config.contracts.oracle);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn polling_and_gas_overrides_are_read() {
    let file = write_config(&minimal_with(
        "[polling]\ninterval_ms = 250\ntimeout_secs = 0\n\n[execution]\ndefault_gas = 900000\n",
    ));

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.execution.default_gas, 900_000);
    let policy = config.polling.policy();
    assert_eq!(policy.interval.as_millis(), 250);
    assert_eq!(policy.timeout, None);
}

#[test]
fn bootstrap_requires_a_signing_key() {
    let mut config = Config::parse_toml(&full_toml()).unwrap();
    config.wallet.private_key = None;

    let err = build_service(&config).err().unwrap();

    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "WALLET_PRIVATE_KEY"
        })
    ));
}

#[tokio::test]
async fn bootstrap_requires_a_proxy_address() {
    let mut config = Config::parse_toml(MINIMAL_TOML).unwrap();
    config.wallet.private_key = Some(DEV_KEY.to_string());

    let err = build_service(&config).err().unwrap();

    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "proxy.address"
        })
    ));
}

#[tokio::test]
async fn bootstrap_requires_service_endpoints() {
    let content = minimal_with("[proxy]\naddress = \"0x7777777777777777777777777777777777777777\"\n");
    let mut config = Config::parse_toml(&content).unwrap();
    config.wallet.private_key = Some(DEV_KEY.to_string());

    let err = build_service(&config).err().unwrap();

    assert!(err.to_string().contains("services."), "unexpected error: {err}");
}

#[tokio::test]
async fn bootstrap_wires_a_service_from_full_config() {
    let mut config = Config::parse_toml(&full_toml()).unwrap();
    config.wallet.private_key = Some(DEV_KEY.to_string());

    let service = build_service(&config).unwrap();

    assert_eq!(service.env().default_gas, 1_500_000);
    assert_eq!(
        service.env().contracts.conditional_tokens,
        config.contracts.conditional_tokens
    );
}

//! Relay info client.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{PipelineError, Result};
use crate::port::{RelayInfo, RelayInfoSource};

/// Treat `url` as a directory so relative joins append instead of replacing.
pub(crate) fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Fetches the relay address and fee from the relay's info endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base: Url,
}

impl RelayClient {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base: as_directory(base),
        }
    }
}

#[async_trait]
impl RelayInfoSource for RelayClient {
    async fn info(&self) -> Result<RelayInfo> {
        let url = self.base.join("info")?;
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<RelayInfo>()
            .await?)
    }
}

/// Relay source for proxies that are not relayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelay;

#[async_trait]
impl RelayInfoSource for NoRelay {
    async fn info(&self) -> Result<RelayInfo> {
        Err(PipelineError::Unsupported("no relay configured".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    #[test]
    fn relay_info_parses() {
        let body = format!(
            r#"{{"address":"{}","fee":"0x2386f26fc10000"}}"#,
            Address::repeat_byte(0x0f)
        );
        let info: RelayInfo = serde_json::from_str(&body).unwrap();
        assert_eq!(info.address, Address::repeat_byte(0x0f));
        assert_eq!(info.fee, U256::from(10_000_000_000_000_000u64));
    }

    #[test]
    fn base_path_is_kept_when_joining() {
        let base = as_directory(Url::parse("https://relay.example.org/v1").unwrap());
        assert_eq!(base.join("info").unwrap().as_str(), "https://relay.example.org/v1/info");
    }

    #[tokio::test]
    async fn no_relay_is_unsupported() {
        assert!(NoRelay.info().await.is_err());
    }
}

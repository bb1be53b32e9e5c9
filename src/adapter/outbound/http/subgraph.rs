//! Market indexer (subgraph) sync status.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ExecutionError, PipelineError, Result};
use crate::port::IndexerStatus;

const META_QUERY: &str = "{ _meta { block { number } } }";

#[derive(Serialize)]
struct Query {
    query: &'static str,
}

#[derive(Debug, Deserialize)]
struct Response {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "_meta")]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct Block {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

impl Response {
    fn latest_block(self) -> Result<u64> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(ExecutionError::Provider(format!("subgraph: {}", error.message)).into());
        }
        self.data
            .map(|d| d.meta.block.number)
            .ok_or_else(|| ExecutionError::Provider("subgraph: empty response".to_string()).into())
    }
}

/// GraphQL client for the market subgraph of one network.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    client: Client,
    endpoint: Url,
    chain_id: u64,
}

impl SubgraphClient {
    #[must_use]
    pub fn new(endpoint: Url, chain_id: u64) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            chain_id,
        }
    }
}

#[async_trait]
impl IndexerStatus for SubgraphClient {
    async fn latest_indexed_block(&self, chain_id: u64) -> Result<u64> {
        if chain_id != self.chain_id {
            return Err(
                PipelineError::Unsupported(format!("no subgraph for chain {chain_id}")).into(),
            );
        }
        self.client
            .post(self.endpoint.clone())
            .json(&Query { query: META_QUERY })
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?
            .latest_block()
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ChainConfig;
use crate::domain::models::{BlockTransactions, DecodedTransaction};
use crate::infrastructure::chain::decoder;
use crate::infrastructure::chain::ChainClientError;

/// Read access to a Cosmos chain
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest block height known to the node
    async fn get_current_height(&self) -> Result<u64, ChainClientError>;

    /// Block time and transaction references at `height`
    async fn get_block_transactions(&self, height: u64)
        -> Result<BlockTransactions, ChainClientError>;

    /// Decoded transaction with its execution result
    async fn get_transaction(&self, hash: &str) -> Result<DecodedTransaction, ChainClientError>;
}

/// Client for a CometBFT RPC endpoint and a Cosmos REST endpoint
#[derive(Debug, Clone)]
pub struct CosmosClient {
    client: Client,
    rpc_url: String,
    rest_url: String,
}

impl CosmosClient {
    /// Create a new chain client
    pub fn new(config: &ChainConfig) -> Result<Self, ChainClientError> {
        if config.rpc_url.is_empty() || config.rest_url.is_empty() {
            return Err(ChainClientError::ConfigError(
                "CHAIN_RPC_URL and CHAIN_REST_URL are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            rpc_url: config.rpc_url.trim_end_matches('/').to_string(),
            rest_url: config.rest_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, ChainClientError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ChainClientError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.json::<Value>().await?;
        if let Some(error) = body.get("error") {
            return Err(ChainClientError::ResponseError(format!(
                "node error for {}: {}",
                url, error
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl ChainClient for CosmosClient {
    async fn get_current_height(&self) -> Result<u64, ChainClientError> {
        let url = format!("{}/status", self.rpc_url);
        let body = self.get_json(&url).await?;
        decoder::decode_status_height(&body)
    }

    async fn get_block_transactions(
        &self,
        height: u64,
    ) -> Result<BlockTransactions, ChainClientError> {
        let url = format!("{}/block?height={}", self.rpc_url, height);
        let body = self.get_json(&url).await?;
        decoder::decode_block(&body)
    }

    async fn get_transaction(&self, hash: &str) -> Result<DecodedTransaction, ChainClientError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.rest_url, hash);
        let body = self.get_json(&url).await?;
        decoder::decode_tx_response(&body)
    }
}

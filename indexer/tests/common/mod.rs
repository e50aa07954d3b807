#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{json, Value};

use inscriptions_indexer::config::{
    AppConfig, BridgeConfig, ChainConfig, DatabaseConfig, IndexerConfig, MarketplaceConfig,
    RemoteChainConfig,
};
use inscriptions_indexer::domain::models::{
    BlockTransactions, CarrierTransaction, DecodedTransaction, ExtensionOption, Message,
    RawTransaction, MSG_REVOKE, MSG_SEND,
};
use inscriptions_indexer::domain::protocols::{DispatchStatus, ProtocolRegistry};
use inscriptions_indexer::domain::services::{classifier, BridgeSigner};
use inscriptions_indexer::infrastructure::chain::{ChainClient, ChainClientError};
use inscriptions_indexer::infrastructure::persistence::entities::{token, token_address_history};
use inscriptions_indexer::infrastructure::persistence::repositories::token_repository;

pub const CHAIN_ID: &str = "cosmoshub-4";
pub const DENOM: &str = "uatom";

pub const ALICE: &str = "cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du";
pub const BOB: &str = "cosmos1qgpqyqszqgpqyqszqgpqyqszqgpqyqszrh8mx2";
pub const CAROL: &str = "cosmos1qvpsxqcrqvpsxqcrqvpsxqcrqvpsxqcrz8x6vt";
pub const ADMIN: &str = "cosmos1qszqgpqyqszqgpqyqszqgpqyqszqgpqyzhplth";
pub const BRIDGE_ESCROW: &str = "bridge:escrow";

pub const REMOTE_CHAIN: &str = "osmosis-1";
pub const REMOTE_CONTRACT: &str = "osmo1contract";

pub const BRIDGE_KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

const GENESIS_TIME: i64 = 1_700_000_000;

/// In-memory SQLite database with all migrations applied
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("failed to open sqlite database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        chain: ChainConfig {
            chain_id: CHAIN_ID.to_string(),
            rpc_url: "http://localhost:26657".to_string(),
            rest_url: "http://localhost:1317".to_string(),
            native_denom: DENOM.to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        indexer: IndexerConfig {
            start_height: None,
            process_interval_ms: 10,
        },
        bridge: BridgeConfig {
            private_key: Some(BRIDGE_KEY.to_string()),
            admin_address: ADMIN.to_string(),
            escrow_address: BRIDGE_ESCROW.to_string(),
            remote_chains: vec![RemoteChainConfig {
                remote_chain_id: REMOTE_CHAIN.to_string(),
                remote_contract: REMOTE_CONTRACT.to_string(),
                ibc_channel: Some("channel-0".to_string()),
            }],
        },
        marketplace: MarketplaceConfig {
            max_deposit_timeout: 50,
        },
    }
}

pub fn signer() -> Arc<BridgeSigner> {
    Arc::new(BridgeSigner::from_hex(BRIDGE_KEY).expect("valid test key"))
}

/// Registry with every protocol, the bridge included
pub fn registry(db: &DatabaseConnection) -> ProtocolRegistry {
    ProtocolRegistry::from_config(db.clone(), &test_config(), Some(signer()))
}

pub fn assert_rejected(status: DispatchStatus, fragment: &str) {
    match status {
        DispatchStatus::Rejected(reason) => assert!(
            reason.contains(fragment),
            "rejection '{}' should mention '{}'",
            reason,
            fragment
        ),
        other => panic!("expected rejection, got {:?}", other),
    }
}

pub fn block_time(height: u64) -> NaiveDateTime {
    DateTime::from_timestamp(GENESIS_TIME + height as i64 * 6, 0)
        .expect("valid timestamp")
        .naive_utc()
}

/// `urn:<protocol>:cosmoshub-4@v1;<operation>$<key_values>`
pub fn urn(protocol: &str, operation: &str, key_values: &str) -> String {
    format!(
        "urn:{}:{}@v1;{}${}",
        protocol, CHAIN_ID, operation, key_values
    )
}

/// Builds carrier transactions the way they arrive from the chain
pub struct CarrierBuilder {
    hash: String,
    height: u64,
    sender: String,
    urn: String,
    metadata: Option<Vec<u8>>,
    content: Option<Vec<u8>>,
    payments: Vec<(String, u64)>,
    code: u32,
}

impl CarrierBuilder {
    pub fn new(hash: &str, height: u64, sender: &str, urn: &str) -> Self {
        Self {
            hash: hash.to_string(),
            height,
            sender: sender.to_string(),
            urn: urn.to_string(),
            metadata: None,
            content: None,
            payments: Vec::new(),
            code: 0,
        }
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata.to_string().into_bytes());
        self
    }

    /// Metadata bytes as sent, not necessarily JSON
    pub fn raw_metadata(mut self, metadata: &[u8]) -> Self {
        self.metadata = Some(metadata.to_vec());
        self
    }

    pub fn content(mut self, content: &[u8]) -> Self {
        self.content = Some(content.to_vec());
        self
    }

    /// Native coins sent to `to` in the same transaction
    pub fn pay(mut self, to: &str, amount: u64) -> Self {
        self.payments.push((to.to_string(), amount));
        self
    }

    pub fn failed(mut self) -> Self {
        self.code = 5;
        self
    }

    pub fn decoded(&self) -> DecodedTransaction {
        let mut messages = vec![Message::new(
            MSG_SEND,
            json!({
                "from_address": self.sender,
                "to_address": self.sender,
                "amount": [{ "denom": DENOM, "amount": "1" }]
            }),
        )];
        for (to, amount) in &self.payments {
            messages.push(Message::new(
                MSG_SEND,
                json!({
                    "from_address": self.sender,
                    "to_address": to,
                    "amount": [{ "denom": DENOM, "amount": amount.to_string() }]
                }),
            ));
        }

        let mut extension_options = vec![ExtensionOption {
            type_url: MSG_REVOKE.to_string(),
            granter: String::new(),
            grantee: self.urn.clone(),
            msg_type_url: self
                .metadata
                .as_ref()
                .map(|m| STANDARD.encode(m))
                .unwrap_or_default(),
        }];
        if let Some(content) = &self.content {
            extension_options.push(ExtensionOption {
                type_url: MSG_REVOKE.to_string(),
                granter: String::new(),
                grantee: "content".to_string(),
                msg_type_url: STANDARD.encode(content),
            });
        }

        DecodedTransaction {
            hash: self.hash.clone(),
            height: self.height,
            code: self.code,
            gas_used: 80_000,
            gas_wanted: 100_000,
            fees: vec![],
            memo: String::new(),
            messages,
            extension_options,
            raw: json!({ "tx_response": { "txhash": self.hash } }),
        }
    }

    pub fn build(self) -> CarrierTransaction {
        classifier::classify(&self.decoded(), block_time(self.height), 250)
            .expect("classifiable transaction")
            .expect("carrier transaction")
    }
}

pub async fn find_token(db: &DatabaseConnection, ticker: &str) -> token::Model {
    token_repository::find_by_ticker(db, CHAIN_ID, ticker)
        .await
        .expect("token query")
        .expect("token exists")
}

pub async fn balance(db: &DatabaseConnection, ticker: &str, address: &str) -> Decimal {
    let token = find_token(db, ticker).await;
    token_repository::get_balance(db, token.id, address)
        .await
        .expect("balance query")
}

/// Sum of the signed history amounts of an address
pub async fn history_sum(db: &DatabaseConnection, ticker: &str, address: &str) -> Decimal {
    let token = find_token(db, ticker).await;
    token_address_history::Entity::find()
        .filter(token_address_history::Column::TokenId.eq(token.id))
        .filter(token_address_history::Column::Address.eq(address))
        .all(db)
        .await
        .expect("history query")
        .into_iter()
        .map(|row| row.amount)
        .sum()
}

/// Chain client serving prepared blocks
#[derive(Default)]
pub struct FakeChainClient {
    tip: Mutex<u64>,
    blocks: Mutex<HashMap<u64, BlockTransactions>>,
    transactions: Mutex<HashMap<String, DecodedTransaction>>,
    failing_heights: Mutex<HashSet<u64>>,
}

impl FakeChainClient {
    pub fn new(tip: u64) -> Self {
        let client = Self::default();
        client.set_tip(tip);
        client
    }

    pub fn set_tip(&self, tip: u64) {
        *self.tip.lock().unwrap() = tip;
    }

    pub fn add_block(&self, height: u64, transactions: Vec<DecodedTransaction>) {
        let raw = transactions
            .iter()
            .map(|tx| RawTransaction {
                hash: tx.hash.clone(),
                size: 250,
            })
            .collect();

        let mut stored = self.transactions.lock().unwrap();
        for tx in transactions {
            stored.insert(tx.hash.clone(), tx);
        }

        self.blocks.lock().unwrap().insert(
            height,
            BlockTransactions {
                height,
                time: block_time(height),
                transactions: raw,
            },
        );
    }

    pub fn fail_height(&self, height: u64) {
        self.failing_heights.lock().unwrap().insert(height);
    }

    pub fn heal_height(&self, height: u64) {
        self.failing_heights.lock().unwrap().remove(&height);
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    async fn get_current_height(&self) -> Result<u64, ChainClientError> {
        Ok(*self.tip.lock().unwrap())
    }

    async fn get_block_transactions(
        &self,
        height: u64,
    ) -> Result<BlockTransactions, ChainClientError> {
        if self.failing_heights.lock().unwrap().contains(&height) {
            return Err(ChainClientError::ResponseError(format!(
                "block {} unavailable",
                height
            )));
        }

        Ok(self
            .blocks
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .unwrap_or_else(|| BlockTransactions {
                height,
                time: block_time(height),
                transactions: Vec::new(),
            }))
    }

    async fn get_transaction(&self, hash: &str) -> Result<DecodedTransaction, ChainClientError> {
        self.transactions
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or_else(|| ChainClientError::ResponseError(format!("tx {} not found", hash)))
    }
}

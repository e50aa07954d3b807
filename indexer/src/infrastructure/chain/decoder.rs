//! Mapping of CometBFT RPC and Cosmos REST JSON into domain transactions

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::models::{
    BlockTransactions, Coin, DecodedTransaction, ExtensionOption, Message, RawTransaction,
};
use crate::infrastructure::chain::ChainClientError;

/// Upper-case hex sha256 of raw transaction bytes
pub fn tx_hash(raw: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(raw))
}

/// JSON-RPC responses wrap their payload in `result`, some gateways do not
fn rpc_result(value: &Value) -> &Value {
    value.get("result").unwrap_or(value)
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn as_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        _ => 0,
    }
}

fn as_string(value: Option<&Value>) -> String {
    value
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Latest block height from a `/status` response
pub fn decode_status_height(value: &Value) -> Result<u64, ChainClientError> {
    let result = rpc_result(value);
    as_u64(
        result
            .get("sync_info")
            .and_then(|s| s.get("latest_block_height")),
    )
    .ok_or_else(|| ChainClientError::ResponseError("missing sync_info.latest_block_height".into()))
}

/// Block time and transaction hashes from a `/block` response
pub fn decode_block(value: &Value) -> Result<BlockTransactions, ChainClientError> {
    let block = rpc_result(value)
        .get("block")
        .ok_or_else(|| ChainClientError::ResponseError("missing block".into()))?;
    let header = block
        .get("header")
        .ok_or_else(|| ChainClientError::ResponseError("missing block header".into()))?;

    let height = as_u64(header.get("height"))
        .ok_or_else(|| ChainClientError::ResponseError("missing block height".into()))?;
    let time = parse_time(header.get("time").and_then(|t| t.as_str()).unwrap_or_default())?;

    let mut transactions = Vec::new();
    if let Some(txs) = block
        .get("data")
        .and_then(|d| d.get("txs"))
        .and_then(|t| t.as_array())
    {
        for encoded in txs {
            let encoded = encoded.as_str().ok_or_else(|| {
                ChainClientError::ResponseError("transaction is not a string".into())
            })?;
            let raw = STANDARD.decode(encoded).map_err(|e| {
                ChainClientError::ResponseError(format!("invalid transaction encoding: {}", e))
            })?;
            transactions.push(RawTransaction {
                hash: tx_hash(&raw),
                size: raw.len(),
            });
        }
    }

    Ok(BlockTransactions {
        height,
        time,
        transactions,
    })
}

fn parse_time(value: &str) -> Result<NaiveDateTime, ChainClientError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.naive_utc())
        .map_err(|e| ChainClientError::ResponseError(format!("invalid block time '{}': {}", value, e)))
}

fn decode_coins(value: Option<&Value>) -> Vec<Coin> {
    value
        .and_then(|v| serde_json::from_value::<Vec<Coin>>(v.clone()).ok())
        .unwrap_or_default()
}

fn decode_extension_option(value: &Value) -> ExtensionOption {
    ExtensionOption {
        type_url: as_string(value.get("@type")),
        granter: as_string(value.get("granter")),
        grantee: as_string(value.get("grantee")),
        msg_type_url: as_string(value.get("msg_type_url")),
    }
}

/// Map a `/cosmos/tx/v1beta1/txs/{hash}` response into a decoded transaction
pub fn decode_tx_response(value: &Value) -> Result<DecodedTransaction, ChainClientError> {
    let tx_response = value
        .get("tx_response")
        .ok_or_else(|| ChainClientError::ResponseError("missing tx_response".into()))?;
    let tx = value
        .get("tx")
        .or_else(|| tx_response.get("tx"))
        .ok_or_else(|| ChainClientError::ResponseError("missing tx".into()))?;
    let body = tx
        .get("body")
        .ok_or_else(|| ChainClientError::ResponseError("missing tx body".into()))?;

    let hash = as_string(tx_response.get("txhash")).to_uppercase();
    let height = as_u64(tx_response.get("height"))
        .ok_or_else(|| ChainClientError::ResponseError("missing tx height".into()))?;

    let messages = body
        .get("messages")
        .and_then(|m| m.as_array())
        .map(|items| {
            items
                .iter()
                .map(|m| Message::new(as_string(m.get("@type")), m.clone()))
                .collect()
        })
        .unwrap_or_default();

    let extension_options = ["non_critical_extension_options", "extension_options"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(|v| v.as_array()))
        .flatten()
        .map(decode_extension_option)
        .collect();

    let fees = decode_coins(
        tx.get("auth_info")
            .and_then(|a| a.get("fee"))
            .and_then(|f| f.get("amount")),
    );

    Ok(DecodedTransaction {
        hash,
        height,
        code: as_u64(tx_response.get("code")).unwrap_or(0) as u32,
        gas_used: as_i64(tx_response.get("gas_used")),
        gas_wanted: as_i64(tx_response.get("gas_wanted")),
        fees,
        memo: as_string(body.get("memo")),
        messages,
        extension_options,
        raw: value.clone(),
    })
}

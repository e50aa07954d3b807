use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bank send message type URL
pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
/// IBC fungible token transfer message type URL
pub const MSG_IBC_TRANSFER: &str = "/ibc.applications.transfer.v1.MsgTransfer";
/// Authorization revoke message type URL, used as the metaprotocol carrier
pub const MSG_REVOKE: &str = "/cosmos.authz.v1beta1.MsgRevoke";

/// A single coin amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Decimal,
}

/// A transaction message, kept as its type URL plus the untyped body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub type_url: String,
    pub body: Value,
}

impl Message {
    pub fn new(type_url: impl Into<String>, body: Value) -> Self {
        Self {
            type_url: type_url.into(),
            body,
        }
    }

    /// Returns the sender exposed by the message, if any
    pub fn sender(&self) -> Option<&str> {
        self.body
            .get("from_address")
            .or_else(|| self.body.get("sender"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Returns true for bank sends and IBC transfers
    pub fn is_funds_transfer(&self) -> bool {
        self.type_url == MSG_SEND || self.type_url == MSG_IBC_TRANSFER
    }

    /// Coins moved by a bank send from `from` to `to`
    pub fn bank_send_coins(&self, from: &str, to: &str) -> Vec<Coin> {
        if self.type_url != MSG_SEND {
            return Vec::new();
        }

        let from_matches = self.body.get("from_address").and_then(|v| v.as_str()) == Some(from);
        let to_matches = self.body.get("to_address").and_then(|v| v.as_str()) == Some(to);
        if !from_matches || !to_matches {
            return Vec::new();
        }

        self.body
            .get("amount")
            .and_then(|v| serde_json::from_value::<Vec<Coin>>(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// A non-critical extension option entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionOption {
    pub type_url: String,
    pub granter: String,
    pub grantee: String,
    pub msg_type_url: String,
}

impl ExtensionOption {
    pub fn is_revoke(&self) -> bool {
        self.type_url == MSG_REVOKE
    }
}

/// Structured form of a chain transaction, as produced by the decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTransaction {
    pub hash: String,
    pub height: u64,
    /// Execution result code, 0 means success
    pub code: u32,
    pub gas_used: i64,
    pub gas_wanted: i64,
    pub fees: Vec<Coin>,
    pub memo: String,
    pub messages: Vec<Message>,
    pub extension_options: Vec<ExtensionOption>,
    /// The decoded transaction as returned by the node
    pub raw: Value,
}

impl DecodedTransaction {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Fees rendered as `<amount><denom>` joined by commas
    pub fn fees_string(&self) -> String {
        self.fees
            .iter()
            .map(|c| format!("{}{}", c.amount, c.denom))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Total of `denom` sent by bank messages from `from` to `to`, saturating at `Decimal::MAX`
    pub fn amount_sent(&self, from: &str, to: &str, denom: &str) -> Decimal {
        self.messages
            .iter()
            .flat_map(|m| m.bank_send_coins(from, to))
            .filter(|c| c.denom == denom)
            .fold(Decimal::ZERO, |total, c| total.saturating_add(c.amount))
    }
}

/// A transaction reference inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// Upper-case hex sha256 of the raw bytes
    pub hash: String,
    /// Size of the raw bytes
    pub size: usize,
}

/// Transactions of a block at a given height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTransactions {
    pub height: u64,
    pub time: NaiveDateTime,
    pub transactions: Vec<RawTransaction>,
}

/// Protocol payload carried by the revoke extension entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolPayload {
    pub protocol_id: String,
    pub protocol_version: String,
    /// The full protocol URN string
    pub urn: String,
    /// Decoded metadata bytes, usually JSON
    pub metadata: Option<Vec<u8>>,
    /// Decoded content bytes
    pub content: Option<Vec<u8>>,
}

/// A transaction that qualified as a metaprotocol carrier
#[derive(Debug, Clone)]
pub struct CarrierTransaction {
    pub hash: String,
    pub height: u64,
    pub block_time: NaiveDateTime,
    pub sender: String,
    pub size: usize,
    pub payload: ProtocolPayload,
    pub decoded: DecodedTransaction,
}

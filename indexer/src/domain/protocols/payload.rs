//! Typed extension payloads, decoded per protocol

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::ProtocolError;
use crate::domain::models::ProtocolPayload;

/// Metadata and content attached to an inscription operation
#[derive(Debug, Clone, PartialEq)]
pub struct InscriptionPayload {
    /// Metadata JSON object
    pub metadata: Value,
    pub content: Option<Vec<u8>>,
}

/// A single launchpad stage as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchStage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub start: Option<i64>,
    /// Unix seconds
    #[serde(default)]
    pub finish: Option<i64>,
    /// Price in smallest native units
    pub price: Decimal,
    /// 0 means unlimited
    pub per_user_limit: i32,
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,
}

/// Launchpad configuration carried by a `launch` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchPayload {
    #[serde(default)]
    pub max_supply: Option<i64>,
    pub stages: Vec<LaunchStage>,
}

/// Decoded extension payload of a carrier transaction
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionPayload {
    None,
    Inscription(InscriptionPayload),
    Launch(LaunchPayload),
}

type Decoder = fn(&ProtocolPayload) -> Result<ExtensionPayload, ProtocolError>;

/// Operations that read a payload; everything else decodes to `None`
const DECODERS: &[(&str, &[&str], Decoder)] = &[
    (
        super::inscription::PROTOCOL,
        &[super::inscription::ACTION_INSCRIBE, super::inscription::ACTION_COLLECTION],
        decode_inscription,
    ),
    (super::launchpad::PROTOCOL, &[super::launchpad::ACTION_LAUNCH], decode_launch),
];

/// Decode the payload of `operation` on `protocol_id`
pub fn decode(
    protocol_id: &str,
    operation: &str,
    payload: &ProtocolPayload,
) -> Result<ExtensionPayload, ProtocolError> {
    let decoder = DECODERS
        .iter()
        .find(|(id, operations, _)| *id == protocol_id && operations.contains(&operation));
    match decoder {
        Some((_, _, decoder)) => decoder(payload),
        None => Ok(ExtensionPayload::None),
    }
}

fn decode_inscription(payload: &ProtocolPayload) -> Result<ExtensionPayload, ProtocolError> {
    let Some(metadata) = payload.metadata.as_deref() else {
        return Ok(ExtensionPayload::None);
    };

    let metadata: Value = serde_json::from_slice(metadata)
        .map_err(|e| ProtocolError::InvalidPayload(format!("metadata is not JSON: {}", e)))?;
    if !metadata.is_object() {
        return Err(ProtocolError::InvalidPayload(
            "metadata must be a JSON object".to_string(),
        ));
    }

    Ok(ExtensionPayload::Inscription(InscriptionPayload {
        metadata,
        content: payload.content.clone(),
    }))
}

fn decode_launch(payload: &ProtocolPayload) -> Result<ExtensionPayload, ProtocolError> {
    let Some(metadata) = payload.metadata.as_deref() else {
        return Ok(ExtensionPayload::None);
    };

    let launch: LaunchPayload = serde_json::from_slice(metadata)
        .map_err(|e| ProtocolError::InvalidPayload(format!("invalid launch payload: {}", e)))?;
    Ok(ExtensionPayload::Launch(launch))
}

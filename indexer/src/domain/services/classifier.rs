//! Detection of metaprotocol carrier transactions

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDateTime;

use crate::domain::errors::ClassifierError;
use crate::domain::models::{CarrierTransaction, DecodedTransaction, ProtocolPayload};

/// A carrier moves funds and holds a revoke extension whose grantee is the protocol string
pub fn is_inscription_carrier(tx: &DecodedTransaction) -> bool {
    let moves_funds = tx.messages.iter().any(|m| m.is_funds_transfer());
    let has_urn = tx
        .extension_options
        .iter()
        .find(|o| o.is_revoke())
        .is_some_and(|o| !o.grantee.is_empty());
    moves_funds && has_urn
}

/// Sender of the first message
pub fn extract_sender(tx: &DecodedTransaction) -> Result<String, ClassifierError> {
    tx.messages
        .first()
        .and_then(|m| m.sender())
        .map(|s| s.to_string())
        .ok_or(ClassifierError::NoSenderFound)
}

/// Protocol string, metadata and content carried by the revoke entries
pub fn extract_protocol_payload(tx: &DecodedTransaction) -> Result<ProtocolPayload, ClassifierError> {
    let mut revokes = tx.extension_options.iter().filter(|o| o.is_revoke());

    let first = revokes
        .next()
        .filter(|o| !o.grantee.is_empty())
        .ok_or(ClassifierError::NoPayload)?;
    let second = revokes.next();

    let urn = first.grantee.clone();
    let (protocol_id, protocol_version) = protocol_header(&urn);

    Ok(ProtocolPayload {
        protocol_id,
        protocol_version,
        metadata: decode_optional(&first.msg_type_url)?,
        content: match second {
            Some(entry) => decode_optional(&entry.msg_type_url)?,
            None => None,
        },
        urn,
    })
}

/// Protocol id and version read without validating the rest of the string
fn protocol_header(urn: &str) -> (String, String) {
    let mut parts = urn.splitn(3, ':');
    let _scheme = parts.next();
    let protocol_id = parts.next().unwrap_or_default().to_string();
    let version = parts
        .next()
        .and_then(|rest| rest.split(';').next())
        .and_then(|head| head.split_once('@'))
        .map(|(_, version)| version.to_string())
        .unwrap_or_default();
    (protocol_id, version)
}

fn decode_optional(encoded: &str) -> Result<Option<Vec<u8>>, ClassifierError> {
    if encoded.is_empty() {
        return Ok(None);
    }
    STANDARD
        .decode(encoded)
        .map(Some)
        .map_err(|e| ClassifierError::MalformedPayload(e.to_string()))
}

/// Classify a decoded transaction; `Ok(None)` for anything that is not a successful carrier
pub fn classify(
    tx: &DecodedTransaction,
    block_time: NaiveDateTime,
    size: usize,
) -> Result<Option<CarrierTransaction>, ClassifierError> {
    if !tx.is_success() || !is_inscription_carrier(tx) {
        return Ok(None);
    }

    let sender = extract_sender(tx)?;
    let payload = extract_protocol_payload(tx)?;

    Ok(Some(CarrierTransaction {
        hash: tx.hash.clone(),
        height: tx.height,
        block_time,
        sender,
        size,
        payload,
        decoded: tx.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ExtensionOption, Message, MSG_REVOKE, MSG_SEND};
    use serde_json::json;

    fn revoke(grantee: &str, msg_type_url: &str) -> ExtensionOption {
        ExtensionOption {
            type_url: MSG_REVOKE.to_string(),
            granter: String::new(),
            grantee: grantee.to_string(),
            msg_type_url: msg_type_url.to_string(),
        }
    }

    fn transaction(extension_options: Vec<ExtensionOption>) -> DecodedTransaction {
        DecodedTransaction {
            hash: "ABCD".to_string(),
            height: 10,
            code: 0,
            gas_used: 0,
            gas_wanted: 0,
            fees: vec![],
            memo: String::new(),
            messages: vec![Message::new(
                MSG_SEND,
                json!({ "from_address": "cosmos1sender", "to_address": "cosmos1sender", "amount": [] }),
            )],
            extension_options,
            raw: json!({}),
        }
    }

    #[test]
    fn detects_carrier() {
        let tx = transaction(vec![revoke("urn:cft20:cosmoshub-4@v1;deploy$tic=A", "")]);
        assert!(is_inscription_carrier(&tx));

        let tx = transaction(vec![revoke("", "")]);
        assert!(!is_inscription_carrier(&tx));

        let mut tx = transaction(vec![revoke("urn:cft20:cosmoshub-4@v1;deploy$tic=A", "")]);
        tx.messages[0].type_url = "/cosmos.staking.v1beta1.MsgDelegate".to_string();
        assert!(!is_inscription_carrier(&tx));
    }

    #[test]
    fn extracts_payload_parts() {
        let metadata = STANDARD.encode(br#"{"name":"x"}"#);
        let content = STANDARD.encode(b"hello");
        let tx = transaction(vec![
            revoke("urn:inscription:cosmoshub-4@v2;inscribe$h=aa", &metadata),
            revoke("ignored", &content),
        ]);

        let payload = extract_protocol_payload(&tx).unwrap();
        assert_eq!(payload.protocol_id, "inscription");
        assert_eq!(payload.protocol_version, "v2");
        assert_eq!(payload.metadata.as_deref(), Some(&br#"{"name":"x"}"#[..]));
        assert_eq!(payload.content.as_deref(), Some(&b"hello"[..]));
    }

    #[test]
    fn bad_base64_is_malformed_payload() {
        let tx = transaction(vec![revoke("urn:inscription:cosmoshub-4@v1;inscribe$h=aa", "%%%")]);
        assert!(matches!(
            extract_protocol_payload(&tx),
            Err(ClassifierError::MalformedPayload(_))
        ));
    }

    #[test]
    fn missing_sender_is_reported() {
        let mut tx = transaction(vec![revoke("urn:cft20:cosmoshub-4@v1;deploy$tic=A", "")]);
        tx.messages[0].body = json!({ "to_address": "cosmos1x" });
        assert_eq!(extract_sender(&tx), Err(ClassifierError::NoSenderFound));
    }

    #[test]
    fn failed_transactions_are_not_classified() {
        let mut tx = transaction(vec![revoke("urn:cft20:cosmoshub-4@v1;deploy$tic=A", "")]);
        tx.code = 5;
        let block_time = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        assert!(classify(&tx, block_time, 100).unwrap().is_none());
    }
}

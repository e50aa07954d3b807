//! Parser for metaprotocol instruction strings
//!
//! Grammar: `urn:<protocol>:<chain_id>@<version>;<operation>$<key>=<value>(,<key>=<value>)*`

use std::collections::BTreeMap;

use crate::domain::errors::UrnParseError;
use crate::domain::models::ProtocolUrn;

/// Parse a full protocol string into its parts
pub fn parse(input: &str) -> Result<ProtocolUrn, UrnParseError> {
    let malformed = || UrnParseError::MalformedProtocolString(input.to_string());

    let mut parts = input.splitn(3, ':');
    let scheme = parts.next().ok_or_else(malformed)?;
    let protocol = parts.next().ok_or_else(malformed)?;
    let specific = parts.next().ok_or_else(malformed)?;

    if !scheme.eq_ignore_ascii_case("urn") || protocol.is_empty() {
        return Err(malformed());
    }

    let (chain_id, version, operation, key_values) =
        parse_specific(specific).ok_or_else(malformed)?;

    Ok(ProtocolUrn {
        protocol: protocol.to_string(),
        chain_id: chain_id.to_string(),
        version: version.to_string(),
        operation: operation.to_string(),
        key_values: parse_key_values(key_values)?,
    })
}

/// Split `<chain_id>@<version>;<operation>$<kv>`, each separator exactly once
fn parse_specific(specific: &str) -> Option<(&str, &str, &str, &str)> {
    let (head, tail) = split_exactly(specific, ';')?;
    let (chain_id, version) = split_exactly(head, '@')?;
    let (operation, key_values) = split_exactly(tail, '$')?;
    Some((chain_id, version, operation, key_values))
}

fn split_exactly(value: &str, separator: char) -> Option<(&str, &str)> {
    let mut parts = value.split(separator);
    let first = parts.next()?;
    let second = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

/// Tokens without `=` continue the previous value, joined back with `,`
fn parse_key_values(section: &str) -> Result<BTreeMap<String, String>, UrnParseError> {
    let mut key_values = BTreeMap::new();
    if section.is_empty() {
        return Ok(key_values);
    }

    let mut last_key: Option<String> = None;
    for token in section.split(',') {
        let pieces: Vec<&str> = token.split('=').collect();
        match pieces.as_slice() {
            [continuation] => {
                let key = last_key
                    .as_ref()
                    .ok_or_else(|| UrnParseError::MalformedKeyValue(token.to_string()))?;
                if let Some(value) = key_values.get_mut(key) {
                    value.push(',');
                    value.push_str(continuation);
                }
            }
            [key, value] => {
                if key.is_empty() {
                    return Err(UrnParseError::MalformedKeyValue(token.to_string()));
                }
                key_values.insert(key.to_string(), value.to_string());
                last_key = Some(key.to_string());
            }
            _ => return Err(UrnParseError::MalformedKeyValue(token.to_string())),
        }
    }

    Ok(key_values)
}

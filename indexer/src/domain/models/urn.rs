use std::collections::BTreeMap;
use std::fmt;

/// A parsed metaprotocol instruction
///
/// Renders back to `urn:<protocol>:<chain_id>@<version>;<operation>$<k>=<v>,...`
/// with keys in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolUrn {
    pub protocol: String,
    pub chain_id: String,
    pub version: String,
    pub operation: String,
    pub key_values: BTreeMap<String, String>,
}

impl ProtocolUrn {
    /// Returns the value of `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.get(key).map(|v| v.as_str())
    }
}

impl fmt::Display for ProtocolUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "urn:{}:{}@{};{}$",
            self.protocol, self.chain_id, self.version, self.operation
        )?;

        let pairs = self
            .key_values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", pairs)
    }
}

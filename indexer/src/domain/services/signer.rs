//! Ed25519 attestations for bridge transfers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for bridge key handling
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid hex key: {0}")]
    InvalidHex(String),
    #[error("invalid key length: expected 32, got {0}")]
    InvalidLength(usize),
}

/// Signs bridge messages with the key held by the indexer
#[derive(Clone)]
pub struct BridgeSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl std::fmt::Debug for BridgeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSigner")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

impl BridgeSigner {
    /// Create from existing secret key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create from a hex encoded secret key
    pub fn from_hex(hex_str: &str) -> Result<Self, SignerError> {
        let bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))
            .map_err(|e| SignerError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SignerError::InvalidLength(bytes.len()))?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }

    /// Sign a message, returning the base64 signature
    pub fn sign(&self, message: &[u8]) -> String {
        let signature: Signature = self.signing_key.sign(message);
        STANDARD.encode(signature.to_bytes())
    }

    /// Check a base64 signature produced by this key
    pub fn verify(&self, message: &[u8], signature: &str) -> bool {
        let Ok(bytes) = STANDARD.decode(signature) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            return false;
        };
        self.verifying_key.verify(message, &signature).is_ok()
    }
}

/// Attestation for tokens sent to a remote chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAttestation {
    pub chain_id: String,
    pub tx_hash: String,
    pub ticker: String,
    /// Amount in smallest units
    pub amount: Decimal,
    pub remote_chain_id: String,
    pub remote_contract: String,
    pub receiver: String,
}

impl SendAttestation {
    pub fn message(&self) -> Vec<u8> {
        format!(
            "{}{}{}{}{}{}{}",
            self.chain_id,
            self.tx_hash,
            self.ticker,
            self.amount.normalize(),
            self.remote_chain_id,
            self.remote_contract,
            self.receiver
        )
        .into_bytes()
    }
}

/// Attestation for a token enabled on a remote chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableAttestation {
    pub chain_id: String,
    pub ticker: String,
    pub decimals: i32,
    pub remote_chain_id: String,
    pub remote_contract: String,
}

impl EnableAttestation {
    pub fn message(&self) -> Vec<u8> {
        format!(
            "{}{}{}{}{}",
            self.chain_id, self.ticker, self.decimals, self.remote_chain_id, self.remote_contract
        )
        .into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    #[test]
    fn signs_and_verifies() {
        let signer = BridgeSigner::from_hex(KEY).unwrap();
        let attestation = SendAttestation {
            chain_id: "cosmoshub-4".to_string(),
            tx_hash: "ABCD".to_string(),
            ticker: "TOK".to_string(),
            amount: Decimal::new(150000000, 2),
            remote_chain_id: "osmosis-1".to_string(),
            remote_contract: "osmo1contract".to_string(),
            receiver: "osmo1receiver".to_string(),
        };

        assert_eq!(
            attestation.message(),
            b"cosmoshub-4ABCDTOK1500000osmosis-1osmo1contractosmo1receiver".to_vec()
        );

        let signature = signer.sign(&attestation.message());
        assert!(signer.verify(&attestation.message(), &signature));
        assert!(!signer.verify(b"tampered", &signature));
    }

    #[test]
    fn known_public_key() {
        let signer = BridgeSigner::from_hex(KEY).unwrap();
        assert_eq!(
            signer.public_key_hex(),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(matches!(
            BridgeSigner::from_hex("zz"),
            Err(SignerError::InvalidHex(_))
        ));
        assert!(matches!(
            BridgeSigner::from_hex("abcd"),
            Err(SignerError::InvalidLength(2))
        ));
    }
}

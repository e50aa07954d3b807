pub mod classifier;
pub mod signer;
pub mod urn_parser;

pub use signer::{BridgeSigner, EnableAttestation, SendAttestation, SignerError};

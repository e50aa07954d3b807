pub mod transaction;
pub mod urn;

pub use transaction::{
    BlockTransactions, CarrierTransaction, Coin, DecodedTransaction, ExtensionOption, Message,
    ProtocolPayload, RawTransaction, MSG_IBC_TRANSFER, MSG_REVOKE, MSG_SEND,
};
pub use urn::ProtocolUrn;

pub mod client;
pub mod decoder;
mod error;

pub use client::{ChainClient, CosmosClient};
pub use error::ChainClientError;

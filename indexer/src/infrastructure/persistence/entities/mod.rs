pub mod bridge_history;
pub mod bridge_remote_chain;
pub mod bridge_token;
pub mod checkpoint;
pub mod collection;
pub mod inscription;
pub mod inscription_history;
pub mod launchpad;
pub mod launchpad_mint_reservation;
pub mod launchpad_stage;
pub mod launchpad_whitelist;
pub mod marketplace_cft20_detail;
pub mod marketplace_inscription_detail;
pub mod marketplace_listing;
pub mod token;
pub mod token_address_history;
pub mod token_holder;
pub mod transaction;

pub mod prelude {
    pub use super::bridge_history::Entity as BridgeHistory;
    pub use super::bridge_remote_chain::Entity as BridgeRemoteChain;
    pub use super::bridge_token::Entity as BridgeToken;
    pub use super::checkpoint::Entity as Checkpoint;
    pub use super::collection::Entity as Collection;
    pub use super::inscription::Entity as Inscription;
    pub use super::inscription_history::Entity as InscriptionHistory;
    pub use super::launchpad::Entity as Launchpad;
    pub use super::launchpad_mint_reservation::Entity as LaunchpadMintReservation;
    pub use super::launchpad_stage::Entity as LaunchpadStage;
    pub use super::launchpad_whitelist::Entity as LaunchpadWhitelist;
    pub use super::marketplace_cft20_detail::Entity as MarketplaceCft20Detail;
    pub use super::marketplace_inscription_detail::Entity as MarketplaceInscriptionDetail;
    pub use super::marketplace_listing::Entity as MarketplaceListing;
    pub use super::token::Entity as Token;
    pub use super::token_address_history::Entity as TokenAddressHistory;
    pub use super::token_holder::Entity as TokenHolder;
    pub use super::transaction::Entity as Transaction;
}

use std::error::Error;
use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::infrastructure::chain::ChainClientError;
use crate::infrastructure::persistence::error::DbError;

/// Error type for protocol URN parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrnParseError {
    #[error("malformed protocol string: {0}")]
    MalformedProtocolString(String),
    #[error("malformed key/value section: {0}")]
    MalformedKeyValue(String),
}

/// Error type for transaction classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("no sender found in transaction messages")]
    NoSenderFound,
    #[error("no metaprotocol payload in extension options")]
    NoPayload,
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Error type for protocol handlers
///
/// Everything except a non-duplicate `Db` is a validation outcome: the transaction is recorded
/// as rejected and ingestion continues.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Parse(#[from] UrnParseError),
    #[error("chain id mismatch: expected {expected}, got {found}")]
    ChainIdMismatch { expected: String, found: String },
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("ticker {0} already exists")]
    DuplicateTicker(String),
    #[error("token {0} not found")]
    TokenNotFound(String),
    #[error("token {0} is not open for minting yet")]
    NotLaunched(String),
    #[error("insufficient balance: {address} holds {available}, needs {required}")]
    InsufficientBalance {
        address: String,
        available: Decimal,
        required: Decimal,
    },
    #[error("max supply exceeded for {0}")]
    SupplyExceeded(String),
    #[error("per-wallet mint limit exceeded for {0}")]
    MintLimitExceeded(String),
    #[error("inscription {0} not found")]
    InscriptionNotFound(String),
    #[error("inscription with content hash {0} already exists")]
    DuplicateInscription(String),
    #[error("content hash mismatch: declared {declared}, computed {computed}")]
    ContentHashMismatch { declared: String, computed: String },
    #[error("{address} is not the owner of {asset}")]
    NotOwner { address: String, asset: String },
    #[error("collection {0} not found")]
    CollectionNotFound(String),
    #[error("collection symbol {0} already exists")]
    DuplicateCollection(String),
    #[error("remote chain {0} is not configured")]
    UnknownRemoteChain(String),
    #[error("remote contract mismatch for {remote_chain_id}: expected {expected}, got {found}")]
    RemoteContractMismatch {
        remote_chain_id: String,
        expected: String,
        found: String,
    },
    #[error("token {ticker} is not enabled for {remote_chain_id}")]
    TokenNotEnabled {
        ticker: String,
        remote_chain_id: String,
    },
    #[error("{0} is not authorized for this operation")]
    Unauthorized(String),
    #[error("listing {0} not found")]
    ListingNotFound(String),
    #[error("listing {0} is already filled or cancelled")]
    ListingClosed(String),
    #[error("listing {0} has no active deposit from the sender")]
    ListingNotDeposited(String),
    #[error("listing {0} holds an active deposit")]
    ListingDeposited(String),
    #[error("insufficient payment: sent {sent}, required {required}")]
    InsufficientPayment { sent: Decimal, required: Decimal },
    #[error("launchpad already exists for collection {0}")]
    LaunchpadExists(String),
    #[error("launchpad not found for collection {0}")]
    LaunchpadNotFound(String),
    #[error("stage {0} not found")]
    StageNotFound(i32),
    #[error("stage {0} is not active")]
    StageNotActive(i32),
    #[error("{0} is not whitelisted for this stage")]
    NotWhitelisted(String),
    #[error("{0} reached the per-user limit for this stage")]
    UserLimitReached(String),
    #[error("launchpad supply exhausted for collection {0}")]
    SupplyExhausted(String),
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

impl ProtocolError {
    /// Infrastructure failures abort the current polling cycle.
    /// Unique violations come from the transaction's own data and only reject it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProtocolError::Db(e) if !e.is_duplicate())
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ProtocolError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl From<sea_orm::DbErr> for ProtocolError {
    fn from(error: sea_orm::DbErr) -> Self {
        ProtocolError::Db(DbError::from(error))
    }
}

/// Error type for block processing operations
#[derive(Debug)]
pub enum BlockProcessorError {
    ChainClientError(ChainClientError),
    DbError(DbError),
    ProcessingError(String),
}

impl fmt::Display for BlockProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockProcessorError::ChainClientError(e) => write!(f, "Chain client error: {}", e),
            BlockProcessorError::DbError(e) => write!(f, "Database error: {}", e),
            BlockProcessorError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for BlockProcessorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BlockProcessorError::ChainClientError(e) => Some(e),
            BlockProcessorError::DbError(e) => Some(e),
            BlockProcessorError::ProcessingError(_) => None,
        }
    }
}

impl From<ChainClientError> for BlockProcessorError {
    fn from(error: ChainClientError) -> Self {
        BlockProcessorError::ChainClientError(error)
    }
}

impl From<DbError> for BlockProcessorError {
    fn from(error: DbError) -> Self {
        BlockProcessorError::DbError(error)
    }
}

impl From<sea_orm::DbErr> for BlockProcessorError {
    fn from(error: sea_orm::DbErr) -> Self {
        BlockProcessorError::DbError(DbError::from(error))
    }
}

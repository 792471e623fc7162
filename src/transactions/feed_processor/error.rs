use crate::registry::RegistryError;
use crate::sources::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("Expected transfer is missing: {0}")]
    MissingTransfer(&'static str),

    #[error("Unknown transaction type")]
    UnknownTransactionType,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Event is incomplete: {0} is required")]
    IncompleteEvent(&'static str),
}

impl ClassificationError {
    /// Short tag attached to log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTransfer(_) => "missing_transfer",
            Self::UnknownTransactionType => "unknown_transaction_type",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::IncompleteEvent(_) => "incomplete_event",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransactionParseError {
    #[error("Invalid {field} in transaction {hash}: {reason}")]
    InvalidField {
        hash: String,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid input data in transaction {hash}: {source}")]
    InvalidInput {
        hash: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// The only error a feed request can fail with.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Classification task failed: {0}")]
    Classification(#[from] tokio::task::JoinError),
}

//! Collaborators that feed raw data into the token feed.
//!
//! - [`RawTransferSource`] - fetches the transactions touching an address
//! - [`DisplayNameDirectory`] - best-effort names and images for counterparties
//!
//! Each trait has one concrete adapter: [`BlockscoutClient`] queries a
//! Blockscout GraphQL endpoint and [`KnownAddressDirectory`] serves the
//! `[[known_addresses]]` configuration table.

mod blockscout;
mod directory;

pub use blockscout::BlockscoutClient;
pub use directory::KnownAddressDirectory;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::HttpError;
use crate::models::RawTransactionRecord;

/// Most transactions returned for one address.
pub const MAX_TRANSACTIONS: usize = 100;
/// Most transfers returned per transaction.
pub const MAX_TRANSFERS_PER_TRANSACTION: usize = 10;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Transfer source request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Transfer source returned an invalid payload: {0}")]
    InvalidPayload(String),
}

#[async_trait]
pub trait RawTransferSource: Send + Sync {
    /// Transactions touching `address`, newest first as the upstream returns them.
    async fn fetch(&self, address: &str) -> Result<Vec<RawTransactionRecord>, SourceError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayInfo {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

pub trait DisplayNameDirectory: Send + Sync {
    /// Never fails; a miss is `None`.
    fn lookup(&self, address: &str) -> Option<DisplayInfo>;
}

//! Data models shared by the token feed and the currency conversion service.
//!
//! This module contains the raw records handed to us by the transfer source,
//! the contract-address map used during classification, and the currency
//! codes the conversion graph knows about.
//!
//! # Key Types
//!
//! - [`Transfer`] - A single value transfer inside an on-chain transaction
//! - [`RawTransactionRecord`] - One transaction as returned by the raw-transfer source
//! - [`ContractAddresses`] - Validated role to address map of the core contracts
//! - [`ContractRole`] - The contract roles the classifier understands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod contract_role;
pub use contract_role::{ContractAddresses, ContractRole};
pub mod currency;

/// Address used as the source of newly minted stable tokens.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// A value transfer of a single token between two addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from_address_hash: String,
    pub to_address_hash: String,
    #[serde(default)]
    pub from_account_hash: Option<String>,
    #[serde(default)]
    pub to_account_hash: Option<String>,
    /// Currency code of the transferred token (e.g. "cUSD").
    pub token: String,
    /// Unsigned amount in base units, as a decimal string.
    pub value: String,
}

impl Transfer {
    /// Lowercases every address and maps token aliases onto their canonical code.
    pub fn normalized(self) -> Self {
        Self {
            from_address_hash: self.from_address_hash.to_lowercase(),
            to_address_hash: self.to_address_hash.to_lowercase(),
            from_account_hash: self.from_account_hash.map(|a| a.to_lowercase()),
            to_account_hash: self.to_account_hash.map(|a| a.to_lowercase()),
            token: currency::normalize_currency_code(&self.token),
            value: self.value,
        }
    }
}

/// A transaction touching the queried address, as returned by the raw-transfer source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionRecord {
    pub transaction_hash: String,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    pub gas_price: String,
    pub gas_used: String,
    #[serde(default)]
    pub fee_token: Option<String>,
    #[serde(default)]
    pub gateway_fee: Option<String>,
    #[serde(default)]
    pub gateway_fee_recipient: Option<String>,
    /// Hex encoded call data, `0x` when the transaction is a plain transfer.
    #[serde(default)]
    pub input: String,
    /// Call target of the transaction, when known.
    #[serde(default)]
    pub to_address_hash: Option<String>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

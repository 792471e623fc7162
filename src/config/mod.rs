//! Typed application configuration.
//!
//! Loaded from a TOML file by [`load_configuration`], with environment
//! overrides under the `BLOCKCHAIN_API` prefix, for example
//! `BLOCKCHAIN_API_FEED__FAUCET_ADDRESS=0x...`.

mod loader;

pub use loader::{get_default_config, load_configuration, write_config_to};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub blockscout: UpstreamConfig,
    pub exchange_rates: ExchangeRatesConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub known_addresses: Vec<KnownAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRatesConfig {
    pub fiat_url: String,
    #[serde(default)]
    pub fiat_access_key: Option<String>,
    pub on_chain_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ExchangeRatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub faucet_address: Option<String>,
}

/// Addresses of the core contracts. Attestations, Escrow, Exchange,
/// Governance and Reserve must be present for the feed to run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    pub attestations: Option<String>,
    pub escrow: Option<String>,
    pub exchange: Option<String>,
    pub exchange_eur: Option<String>,
    pub governance: Option<String>,
    pub reserve: Option<String>,
    pub accounts: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnownAddress {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

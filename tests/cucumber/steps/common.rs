// Common World Definition and Utilities for Cucumber BDD Tests
//
// The World holds in-memory stand-ins for every upstream: a list of raw
// transaction records, the contract configuration and two counting rate
// sources.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use blockchain_api::config::{ContractsConfig, KnownAddress};
use blockchain_api::currency_conversion::{CurrencyConversionApi, ExchangeRateQuery, ExchangeRateSource, RateError};
use blockchain_api::models::RawTransactionRecord;
use blockchain_api::registry::{ContractAddressCache, StaticRegistry};
use blockchain_api::sources::{KnownAddressDirectory, RawTransferSource, SourceError};
use blockchain_api::transactions::{Event, TokenTransactionsService};
use cucumber::{World, given};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const USER: &str = "0x5a5a000000000000000000000000000000000001";
pub const FRIEND: &str = "0xbeef000000000000000000000000000000000002";
pub const ATTESTATIONS: &str = "0xa77e570000000000000000000000000000000006";
pub const ESCROW: &str = "0xe5c0000000000000000000000000000000000003";
pub const EXCHANGE: &str = "0xe8c4000000000000000000000000000000000004";
pub const GOVERNANCE: &str = "0x90e0000000000000000000000000000000000007";
pub const RESERVE: &str = "0x5e5e000000000000000000000000000000000005";

// =============================
// Test Doubles
// =============================

#[derive(Debug)]
pub struct CountingRateSource {
    rate: BigDecimal,
    calls: AtomicUsize,
}

impl CountingRateSource {
    pub fn new(rate: i64) -> Arc<Self> {
        Arc::new(Self {
            rate: BigDecimal::from(rate),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateSource for CountingRateSource {
    async fn get_rate(&self, _query: &ExchangeRateQuery) -> Result<BigDecimal, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rate.clone())
    }
}

struct InMemorySource(Vec<RawTransactionRecord>);

#[async_trait]
impl RawTransferSource for InMemorySource {
    async fn fetch(&self, _address: &str) -> Result<Vec<RawTransactionRecord>, SourceError> {
        Ok(self.0.clone())
    }
}

// =============================
// World Definition
// =============================

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct FeedWorld {
    pub gold: Arc<CountingRateSource>,
    pub fiat: Arc<CountingRateSource>,
    pub implied_rates: Option<BTreeMap<String, BigDecimal>>,
    pub rate: Option<BigDecimal>,
    pub contracts: ContractsConfig,
    pub records: Vec<RawTransactionRecord>,
    pub events: Vec<Event>,
    pub unknown_transactions: u64,
    pub last_error: Option<String>,
}

impl FeedWorld {
    pub fn new() -> Self {
        Self {
            gold: CountingRateSource::new(10),
            fiat: CountingRateSource::new(20),
            implied_rates: None,
            rate: None,
            contracts: ContractsConfig::default(),
            records: Vec::new(),
            events: Vec::new(),
            unknown_transactions: 0,
            last_error: None,
        }
    }

    pub fn conversion(&self) -> CurrencyConversionApi {
        CurrencyConversionApi::new(self.gold.clone(), self.fiat.clone())
    }

    pub fn feed_service(&self) -> TokenTransactionsService {
        let registry = Arc::new(StaticRegistry::new(&self.contracts));
        let directory = KnownAddressDirectory::new(&[KnownAddress {
            address: FRIEND.to_string(),
            name: Some("Friend".to_string()),
            image_url: None,
        }]);
        TokenTransactionsService::new(
            Arc::new(InMemorySource(self.records.clone())),
            Arc::new(ContractAddressCache::new(registry)),
            Arc::new(directory),
            Arc::new(self.conversion()),
            None,
        )
    }
}

// =============================
// Common Step Definitions
// =============================

#[given(expr = "the gold rate is {int}")]
async fn gold_rate(world: &mut FeedWorld, rate: i64) {
    world.gold = CountingRateSource::new(rate);
}

#[given(expr = "the generic fiat rate is {int}")]
async fn fiat_rate(world: &mut FeedWorld, rate: i64) {
    world.fiat = CountingRateSource::new(rate);
}

#[given("the core contracts are registered")]
async fn core_contracts(world: &mut FeedWorld) {
    world.contracts = ContractsConfig {
        attestations: Some(ATTESTATIONS.to_string()),
        escrow: Some(ESCROW.to_string()),
        exchange: Some(EXCHANGE.to_string()),
        exchange_eur: None,
        governance: Some(GOVERNANCE.to_string()),
        reserve: Some(RESERVE.to_string()),
        accounts: None,
    };
}

#[given(expr = "the {word} contract is not registered")]
async fn contract_missing(world: &mut FeedWorld, role: String) {
    match role.as_str() {
        "Attestations" => world.contracts.attestations = None,
        "Escrow" => world.contracts.escrow = None,
        "Exchange" => world.contracts.exchange = None,
        "Governance" => world.contracts.governance = None,
        "Reserve" => world.contracts.reserve = None,
        other => panic!("Unknown contract role: {other}"),
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info, warn};

use super::aggregator::TransactionAggregator;
use super::builder::EventBuilder;
use super::classifier::{ClassifiedTransaction, classify_all};
use super::error::{ClassificationError, FeedError};
use super::rules::ClassificationContext;
use super::transaction::Transaction;
use super::types::{Event, LocalAmount};
use crate::currency_conversion::{ConversionRequest, CurrencyConversionApi};
use crate::log::mask_address;
use crate::models::currency::{LEGACY_TOKENS, normalize_currency_code};
use crate::models::{ContractAddresses, RawTransactionRecord};
use crate::registry::ContractAddressCache;
use crate::sources::{DisplayNameDirectory, RawTransferSource};

#[derive(Debug, Clone, Default)]
pub struct TokenTransactionsQuery {
    pub address: String,
    pub token: Option<String>,
    pub tokens: Option<Vec<String>>,
    pub local_currency_code: Option<String>,
}

impl TokenTransactionsQuery {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// `tokens` wins over `token`; with neither, the legacy stable/native pair.
    pub fn requested_tokens(&self) -> Vec<String> {
        let tokens: Vec<String> = match (&self.tokens, &self.token) {
            (Some(tokens), _) if !tokens.is_empty() => tokens.clone(),
            (_, Some(token)) => vec![token.clone()],
            _ => LEGACY_TOKENS.iter().map(|t| t.to_string()).collect(),
        };
        tokens.iter().map(|t| normalize_currency_code(t.trim())).collect()
    }
}

/// Builds the token feed of an address: fetch, classify, aggregate, build,
/// filter, convert, sort.
pub struct TokenTransactionsService {
    source: Arc<dyn RawTransferSource>,
    contracts: Arc<ContractAddressCache>,
    directory: Arc<dyn DisplayNameDirectory>,
    conversion: Arc<CurrencyConversionApi>,
    faucet_address: Option<String>,
    aggregator: TransactionAggregator,
    unknown_transactions: AtomicU64,
}

impl TokenTransactionsService {
    pub fn new(
        source: Arc<dyn RawTransferSource>,
        contracts: Arc<ContractAddressCache>,
        directory: Arc<dyn DisplayNameDirectory>,
        conversion: Arc<CurrencyConversionApi>,
        faucet_address: Option<String>,
    ) -> Self {
        Self {
            source,
            contracts,
            directory,
            conversion,
            faucet_address: faucet_address.map(|a| a.to_lowercase()),
            aggregator: TransactionAggregator::new(),
            unknown_transactions: AtomicU64::new(0),
        }
    }

    /// Transactions seen so far that matched no rule.
    pub fn unknown_transactions(&self) -> u64 {
        self.unknown_transactions.load(Ordering::Relaxed)
    }

    pub async fn get_token_transactions(&self, query: &TokenTransactionsQuery) -> Result<Vec<Event>, FeedError> {
        let contracts = self.contracts.get().await?;
        let address = query.address.to_lowercase();
        let tokens = query.requested_tokens();

        let raw = self.source.fetch(&address).await?;
        debug!(
            address:% = mask_address(&address),
            count = raw.len();
            "Fetched raw transactions"
        );

        let transactions = self.parse_all(raw);
        let classified = self
            .classify(transactions, contracts.clone(), &address, &tokens)
            .await?;
        let classified = self.aggregator.aggregate(classified);

        let context = ClassificationContext {
            contracts: &contracts,
            faucet_address: self.faucet_address.as_deref(),
            user_address: &address,
            tokens_of_interest: &tokens,
        };

        let mut events: Vec<Event> = self
            .build_events(classified, &context)
            .into_iter()
            .filter(|event| tokens.iter().any(|t| t == event.currency_code()))
            .collect();

        if let Some(local_currency) = query.local_currency_code.as_deref() {
            self.attach_local_amounts(&mut events, local_currency).await;
        }

        events.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        info!(
            address:% = mask_address(&address),
            events = events.len();
            "Token feed built"
        );
        Ok(events)
    }

    fn parse_all(&self, raw: Vec<RawTransactionRecord>) -> Vec<Transaction> {
        raw.into_iter()
            .filter_map(|record| match Transaction::from_raw(record) {
                Ok(transaction) => Some(transaction),
                Err(e) => {
                    warn!(
                        kind = "parse_error",
                        error:% = e;
                        "Dropping malformed transaction"
                    );
                    None
                },
            })
            .collect()
    }

    /// Rule matching runs on the blocking pool.
    async fn classify(
        &self,
        transactions: Vec<Transaction>,
        contracts: Arc<ContractAddresses>,
        address: &str,
        tokens: &[String],
    ) -> Result<Vec<ClassifiedTransaction>, FeedError> {
        let faucet_address = self.faucet_address.clone();
        let user_address = address.to_string();
        let tokens = tokens.to_vec();

        let classified = tokio::task::spawn_blocking(move || {
            let context = ClassificationContext {
                contracts: &contracts,
                faucet_address: faucet_address.as_deref(),
                user_address: &user_address,
                tokens_of_interest: &tokens,
            };
            classify_all(transactions, &context)
        })
        .await?;
        Ok(classified)
    }

    fn build_events(&self, classified: Vec<ClassifiedTransaction>, context: &ClassificationContext<'_>) -> Vec<Event> {
        let builder = EventBuilder::new(self.directory.as_ref());
        classified
            .into_iter()
            .filter_map(|entry| {
                let ClassifiedTransaction { transaction, kind } = entry;
                match (kind.rule().build)(&builder, &transaction, context) {
                    Ok(event) => event,
                    Err(e) => {
                        if matches!(e, ClassificationError::UnknownTransactionType) {
                            self.unknown_transactions.fetch_add(1, Ordering::Relaxed);
                        }
                        error!(
                            kind = e.kind(),
                            rule = kind.as_str(),
                            hash:% = transaction.hash,
                            transfers = transaction.transfers.len(),
                            error:% = e;
                            "Failed to build event, transaction dropped"
                        );
                        None
                    },
                }
            })
            .collect()
    }

    /// Converts every amount to `local_currency`. A failed conversion leaves
    /// that amount without a local value.
    async fn attach_local_amounts(&self, events: &mut [Event], local_currency: &str) {
        let local_currency = normalize_currency_code(local_currency);
        let requests: Vec<ConversionRequest> = events
            .iter()
            .flat_map(|event| event.amounts())
            .map(|amount| {
                ConversionRequest::new(&amount.currency_code, &local_currency)
                    .at(amount.timestamp)
                    .with_implied_rates(amount.implied_exchange_rates.clone())
            })
            .collect();

        let rates = self.conversion.get_exchange_rates(&requests).await;

        let amounts = events.iter_mut().flat_map(|event| event.amounts_mut());
        for (amount, rate) in amounts.zip(rates) {
            match rate {
                Ok(rate) => {
                    amount.local_amount = Some(LocalAmount {
                        value: &amount.value * &rate,
                        currency_code: local_currency.clone(),
                        exchange_rate: rate,
                    });
                },
                Err(e) => {
                    warn!(
                        kind = "local_amount",
                        from:% = amount.currency_code,
                        to:% = local_currency,
                        error:% = e;
                        "Local amount unavailable"
                    );
                },
            }
        }
    }
}

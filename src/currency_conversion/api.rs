use std::collections::BTreeMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt};
use log::debug;

use super::cache::HopRateCache;
use super::error::ConversionError;
use super::sources::{ExchangeRateQuery, ExchangeRateSource};
use super::steps::get_conversion_steps;
use crate::models::currency::normalize_currency_code;

/// Pairs pegged 1:1.
const STABLE_PAIRS: [&str; 4] = ["cUSD/USD", "USD/cUSD", "EUR/cEUR", "cEUR/EUR"];

/// Pairs quoted by the on-chain oracle.
const SUPPORTED_PAIRS: [&str; 4] = ["cGLD/cUSD", "cUSD/cGLD", "cGLD/cEUR", "cEUR/cGLD"];

/// Conversions of one batch in flight at once.
const MAX_CONCURRENT_CONVERSIONS: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub source_currency_code: String,
    pub currency_code: String,
    pub timestamp: Option<i64>,
    /// Rates keyed by `FROM/TO` that take precedence over any source.
    pub implied_exchange_rates: Option<BTreeMap<String, BigDecimal>>,
}

impl ConversionRequest {
    pub fn new(source_currency_code: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            source_currency_code: source_currency_code.into(),
            currency_code: currency_code.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_implied_rates(mut self, rates: Option<BTreeMap<String, BigDecimal>>) -> Self {
        self.implied_exchange_rates = rates;
        self
    }
}

/// Converts between any two currency codes by chaining per-hop rates.
pub struct CurrencyConversionApi {
    on_chain: Arc<dyn ExchangeRateSource>,
    fiat: Arc<dyn ExchangeRateSource>,
}

impl CurrencyConversionApi {
    pub fn new(on_chain: Arc<dyn ExchangeRateSource>, fiat: Arc<dyn ExchangeRateSource>) -> Self {
        Self { on_chain, fiat }
    }

    /// Product of the rates along the conversion path. All hops are fetched concurrently.
    pub async fn get_exchange_rate(&self, request: &ConversionRequest) -> Result<BigDecimal, ConversionError> {
        self.convert(request, &HopRateCache::new()).await
    }

    /// Rates for a batch of requests, in request order.
    ///
    /// Upstream hops shared by several requests are fetched once, and at most
    /// `MAX_CONCURRENT_CONVERSIONS` conversions are in flight at a time.
    pub async fn get_exchange_rates(&self, requests: &[ConversionRequest]) -> Vec<Result<BigDecimal, ConversionError>> {
        let cache = HopRateCache::new();
        let rates: Vec<_> = stream::iter(requests)
            .map(|request| self.convert(request, &cache))
            .buffered(MAX_CONCURRENT_CONVERSIONS)
            .collect()
            .await;
        debug!(
            requests = requests.len(),
            upstream_hops = cache.len();
            "Converted rate batch"
        );
        rates
    }

    async fn convert(&self, request: &ConversionRequest, cache: &HopRateCache) -> Result<BigDecimal, ConversionError> {
        let from = normalize_currency_code(&request.source_currency_code);
        let to = normalize_currency_code(&request.currency_code);
        let steps = get_conversion_steps(&from, &to);

        let hops = steps.windows(2).map(|hop| {
            self.hop_rate(
                &hop[0],
                &hop[1],
                request.timestamp,
                request.implied_exchange_rates.as_ref(),
                cache,
            )
        });
        let rates = try_join_all(hops).await?;

        let rate = rates.into_iter().fold(BigDecimal::from(1i64), |acc, rate| acc * rate);
        debug!(
            from:% = from,
            to:% = to,
            hops = steps.len().saturating_sub(1),
            rate:% = rate;
            "Computed exchange rate"
        );
        Ok(rate)
    }

    /// Rate for a single hop: implied rates first, then pegged pairs, then the
    /// oracle for native pairs, then the fiat source for everything else.
    pub async fn get_supported_exchange_rate(
        &self,
        from: &str,
        to: &str,
        timestamp: Option<i64>,
        implied_exchange_rates: Option<&BTreeMap<String, BigDecimal>>,
    ) -> Result<BigDecimal, ConversionError> {
        self.hop_rate(from, to, timestamp, implied_exchange_rates, &HopRateCache::new())
            .await
    }

    async fn hop_rate(
        &self,
        from: &str,
        to: &str,
        timestamp: Option<i64>,
        implied_exchange_rates: Option<&BTreeMap<String, BigDecimal>>,
        cache: &HopRateCache,
    ) -> Result<BigDecimal, ConversionError> {
        let pair = format!("{from}/{to}");

        if let Some(rate) = implied_exchange_rates.and_then(|rates| rates.get(&pair)) {
            return Ok(rate.clone());
        }
        if STABLE_PAIRS.contains(&pair.as_str()) {
            return Ok(BigDecimal::from(1i64));
        }

        let source = if SUPPORTED_PAIRS.contains(&pair.as_str()) {
            &self.on_chain
        } else {
            &self.fiat
        };
        let key = (from.to_string(), to.to_string(), timestamp);
        cache
            .get_or_fetch(key, move || async move {
                let query = ExchangeRateQuery {
                    source_currency_code: from.to_string(),
                    currency_code: to.to_string(),
                    timestamp,
                };
                source
                    .get_rate(&query)
                    .await
                    .map_err(|source| ConversionError::Rate {
                        from: from.to_string(),
                        to: to.to_string(),
                        source,
                    })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency_conversion::error::RateError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRateSource {
        rate: i64,
        calls: AtomicUsize,
    }

    impl FixedRateSource {
        fn new(rate: i64) -> Arc<Self> {
            Arc::new(Self {
                rate,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateSource for FixedRateSource {
        async fn get_rate(&self, _query: &ExchangeRateQuery) -> Result<BigDecimal, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(BigDecimal::from(self.rate))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ExchangeRateSource for FailingSource {
        async fn get_rate(&self, query: &ExchangeRateQuery) -> Result<BigDecimal, RateError> {
            Err(RateError::MissingQuote {
                from: query.source_currency_code.clone(),
                to: query.currency_code.clone(),
            })
        }
    }

    struct Fixture {
        gold: Arc<FixedRateSource>,
        generic: Arc<FixedRateSource>,
        api: CurrencyConversionApi,
    }

    fn fixture() -> Fixture {
        let gold = FixedRateSource::new(10);
        let generic = FixedRateSource::new(20);
        let api = CurrencyConversionApi::new(gold.clone(), generic.clone());
        Fixture { gold, generic, api }
    }

    fn implied_gold_rate() -> Option<BTreeMap<String, BigDecimal>> {
        Some(BTreeMap::from([("cGLD/cUSD".to_string(), BigDecimal::from(10i64))]))
    }

    async fn rate(fixture: &Fixture, request: ConversionRequest) -> BigDecimal {
        fixture.api.get_exchange_rate(&request).await.unwrap()
    }

    #[tokio::test]
    async fn test_same_currency_is_one_without_fetching() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("ABC", "ABC")).await, BigDecimal::from(1i64));
        assert_eq!(rate(&f, ConversionRequest::new("cUSD", "cUSD")).await, BigDecimal::from(1i64));
        assert_eq!(f.gold.calls() + f.generic.calls(), 0);
    }

    #[tokio::test]
    async fn test_implied_rate_is_used_verbatim() {
        let f = fixture();
        let request = ConversionRequest::new("cGLD", "cUSD").with_implied_rates(implied_gold_rate());
        assert_eq!(rate(&f, request).await, BigDecimal::from(10i64));
        assert_eq!(f.gold.calls() + f.generic.calls(), 0);
    }

    #[tokio::test]
    async fn test_stable_to_native_uses_gold_rate() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("cUSD", "cGLD")).await, BigDecimal::from(10i64));
        assert_eq!(f.gold.calls(), 1);
        assert_eq!(f.generic.calls(), 0);
    }

    #[tokio::test]
    async fn test_native_to_usd_with_implied_rate() {
        let f = fixture();
        let request = ConversionRequest::new("cGLD", "USD").with_implied_rates(implied_gold_rate());
        assert_eq!(rate(&f, request).await, BigDecimal::from(10i64));
        assert_eq!(f.gold.calls() + f.generic.calls(), 0);
    }

    #[tokio::test]
    async fn test_usd_to_native_goes_through_stable_token() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("USD", "cGLD")).await, BigDecimal::from(10i64));
        assert_eq!(f.gold.calls(), 1);
        assert_eq!(f.generic.calls(), 0);
    }

    #[tokio::test]
    async fn test_native_to_mxn_multiplies_hops() {
        let f = fixture();
        let request = ConversionRequest::new("cGLD", "MXN").with_implied_rates(implied_gold_rate());
        assert_eq!(rate(&f, request).await, BigDecimal::from(200i64));
        assert_eq!(f.gold.calls(), 0);
        assert_eq!(f.generic.calls(), 1);
    }

    #[tokio::test]
    async fn test_mxn_to_native_fetches_both_sources() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("MXN", "cGLD")).await, BigDecimal::from(200i64));
        assert_eq!(f.gold.calls(), 1);
        assert_eq!(f.generic.calls(), 1);
    }

    #[tokio::test]
    async fn test_fiat_pair_is_direct() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("USD", "MXN")).await, BigDecimal::from(20i64));
        assert_eq!(f.generic.calls(), 1);
    }

    #[tokio::test]
    async fn test_celo_alias_is_native() {
        let f = fixture();
        assert_eq!(rate(&f, ConversionRequest::new("cUSD", "CELO")).await, BigDecimal::from(10i64));
        assert_eq!(f.gold.calls(), 1);
    }

    #[tokio::test]
    async fn test_hop_failure_names_the_pair() {
        let api = CurrencyConversionApi::new(FixedRateSource::new(10), Arc::new(FailingSource));
        let err = api
            .get_exchange_rate(&ConversionRequest::new("MXN", "cGLD"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to get MXN/USD rate"));
    }

    #[tokio::test]
    async fn test_batch_fetches_shared_hops_once() {
        let f = fixture();
        let mut requests = vec![ConversionRequest::new("MXN", "cGLD").at(1000); 50];
        requests.push(ConversionRequest::new("USD", "MXN").at(2000));

        let rates = f.api.get_exchange_rates(&requests).await;

        assert_eq!(rates.len(), 51);
        assert!(rates[..50].iter().all(|r| r.as_ref().ok() == Some(&BigDecimal::from(200i64))));
        assert_eq!(rates[50].as_ref().ok(), Some(&BigDecimal::from(20i64)));
        assert_eq!(f.gold.calls(), 1);
        assert_eq!(f.generic.calls(), 2);
    }

    #[tokio::test]
    async fn test_batch_keeps_request_order_and_failures() {
        let api = CurrencyConversionApi::new(FixedRateSource::new(10), Arc::new(FailingSource));
        let requests = [
            ConversionRequest::new("cUSD", "cGLD"),
            ConversionRequest::new("USD", "MXN"),
            ConversionRequest::new("cUSD", "USD"),
        ];

        let rates = api.get_exchange_rates(&requests).await;

        assert_eq!(rates[0].as_ref().ok(), Some(&BigDecimal::from(10i64)));
        assert!(rates[1].is_err());
        assert_eq!(rates[2].as_ref().ok(), Some(&BigDecimal::from(1i64)));
    }
}

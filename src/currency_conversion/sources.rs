use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::DateTime;
use log::debug;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::error::RateError;
use crate::http::{HttpClient, HttpError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateQuery {
    pub source_currency_code: String,
    pub currency_code: String,
    /// Milliseconds since the Unix epoch; `None` means the latest rate.
    pub timestamp: Option<i64>,
}

/// Anything that can quote how many `currency_code` one `source_currency_code` buys.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    async fn get_rate(&self, query: &ExchangeRateQuery) -> Result<BigDecimal, RateError>;
}

/// Which upstream API an [`HttpRateSource`] speaks.
#[derive(Debug, Clone)]
pub enum RateApi {
    /// exchangerates-style `GET /{YYYY-MM-DD|latest}?base=&symbols=` returning `{"rates": {CODE: n}}`.
    Fiat { access_key: Option<String> },
    /// Oracle-style `GET /rate?from=&to=&timestamp=` returning `{"rate": n}`.
    OnChain,
}

pub struct HttpRateSource {
    client: HttpClient,
    api: RateApi,
}

impl HttpRateSource {
    pub fn new(base_url: Url, api: RateApi, max_retries: u32, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            client: HttpClient::with_config(base_url, max_retries, timeout)?,
            api,
        })
    }

    async fn fiat_rate(&self, query: &ExchangeRateQuery, access_key: Option<&str>) -> Result<BigDecimal, RateError> {
        let path = match query.timestamp {
            Some(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or(RateError::InvalidTimestamp(ms))?
                .format("%Y-%m-%d")
                .to_string(),
            None => "latest".to_string(),
        };
        let mut params = vec![
            ("base", query.source_currency_code.clone()),
            ("symbols", query.currency_code.clone()),
        ];
        if let Some(key) = access_key {
            params.push(("access_key", key.to_string()));
        }

        let response: Value = self.client.send_request(Method::GET, &path, &params, None).await?;
        let quote = response
            .get("rates")
            .and_then(|rates| rates.get(&query.currency_code))
            .ok_or_else(|| missing_quote(query))?;
        parse_rate(quote)
    }

    async fn on_chain_rate(&self, query: &ExchangeRateQuery) -> Result<BigDecimal, RateError> {
        let mut params = vec![
            ("from", query.source_currency_code.clone()),
            ("to", query.currency_code.clone()),
        ];
        if let Some(ms) = query.timestamp {
            params.push(("timestamp", ms.to_string()));
        }

        let response: Value = self.client.send_request(Method::GET, "rate", &params, None).await?;
        let quote = response.get("rate").ok_or_else(|| missing_quote(query))?;
        parse_rate(quote)
    }
}

#[async_trait]
impl ExchangeRateSource for HttpRateSource {
    async fn get_rate(&self, query: &ExchangeRateQuery) -> Result<BigDecimal, RateError> {
        let rate = match &self.api {
            RateApi::Fiat { access_key } => self.fiat_rate(query, access_key.as_deref()).await?,
            RateApi::OnChain => self.on_chain_rate(query).await?,
        };
        debug!(
            from:% = query.source_currency_code,
            to:% = query.currency_code,
            rate:% = rate;
            "Fetched exchange rate"
        );
        Ok(rate)
    }
}

fn missing_quote(query: &ExchangeRateQuery) -> RateError {
    RateError::MissingQuote {
        from: query.source_currency_code.clone(),
        to: query.currency_code.clone(),
    }
}

/// Quotes arrive as JSON numbers or strings. Numbers keep their exact text.
fn parse_rate(quote: &Value) -> Result<BigDecimal, RateError> {
    let text = match quote {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => return Err(RateError::InvalidRate(other.to_string())),
    };
    BigDecimal::from_str(&text).map_err(|_| RateError::InvalidRate(text))
}

// Currency Conversion Step Definitions

use bigdecimal::BigDecimal;
use blockchain_api::currency_conversion::ConversionRequest;
use cucumber::{given, then, when};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::common::FeedWorld;

// =============================
// Conversion Steps
// =============================

#[given(expr = "the transaction implies {int} cUSD per cGLD")]
async fn implied_rate(world: &mut FeedWorld, rate: i64) {
    world.implied_rates = Some(BTreeMap::from([("cGLD/cUSD".to_string(), BigDecimal::from(rate))]));
}

#[when(expr = "I convert {word} to {word}")]
async fn convert(world: &mut FeedWorld, from: String, to: String) {
    let request = ConversionRequest::new(from, to).with_implied_rates(world.implied_rates.clone());
    match world.conversion().get_exchange_rate(&request).await {
        Ok(rate) => world.rate = Some(rate),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[then(expr = "the exchange rate is {word}")]
async fn rate_is(world: &mut FeedWorld, expected: String) {
    let expected = BigDecimal::from_str(&expected).expect("Invalid expected rate");
    assert_eq!(world.rate.as_ref(), Some(&expected), "error: {:?}", world.last_error);
}

#[then(expr = "the gold source was called {int} time(s)")]
async fn gold_calls(world: &mut FeedWorld, expected: usize) {
    assert_eq!(world.gold.calls(), expected);
}

#[then(expr = "the fiat source was called {int} time(s)")]
async fn fiat_calls(world: &mut FeedWorld, expected: usize) {
    assert_eq!(world.fiat.calls(), expected);
}

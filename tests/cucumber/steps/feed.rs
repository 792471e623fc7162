// Token Feed Step Definitions
//
// Records are described in whole tokens and stored in base units, as the
// transfer source would return them.

use bigdecimal::BigDecimal;
use blockchain_api::models::{RawTransactionRecord, Transfer, ZERO_ADDRESS};
use blockchain_api::transactions::TokenTransactionsQuery;
use chrono::DateTime;
use cucumber::{given, then, when};
use std::str::FromStr;

use super::common::{ESCROW, EXCHANGE, FRIEND, FeedWorld, RESERVE, USER};

fn base_units(whole_tokens: i64) -> String {
    format!("{whole_tokens}000000000000000000")
}

fn transfer(from: &str, to: &str, token: &str, whole_tokens: i64) -> Transfer {
    Transfer {
        from_address_hash: from.to_string(),
        to_address_hash: to.to_string(),
        from_account_hash: None,
        to_account_hash: None,
        token: token.to_string(),
        value: base_units(whole_tokens),
    }
}

fn record(world: &FeedWorld, secs: i64, transfers: Vec<Transfer>) -> RawTransactionRecord {
    RawTransactionRecord {
        transaction_hash: format!("0x{:04x}", world.records.len() + 1),
        block_number: secs as u64,
        timestamp: DateTime::from_timestamp(secs, 0).expect("Invalid timestamp"),
        gas_price: "1000000000".to_string(),
        gas_used: "21000".to_string(),
        fee_token: None,
        gateway_fee: None,
        gateway_fee_recipient: None,
        input: "0x".to_string(),
        to_address_hash: None,
        transfers,
    }
}

// =============================
// Record Steps
// =============================

#[given(expr = "a call to the {word} contract at {int} seconds")]
async fn contract_call(world: &mut FeedWorld, role: String, secs: i64) {
    let target = match role.as_str() {
        "Exchange" => EXCHANGE,
        "Escrow" => ESCROW,
        other => panic!("No call fixture for {other}"),
    };
    let mut call = record(world, secs, vec![]);
    call.input = "0x12345678".to_string();
    call.to_address_hash = Some(target.to_string());
    world.records.push(call);
}

#[given(expr = "an exchange of {int} cGLD for {int} cUSD at {int} seconds")]
async fn exchange(world: &mut FeedWorld, celo: i64, dollars: i64, secs: i64) {
    let exchange = record(
        world,
        secs,
        vec![
            transfer(USER, RESERVE, "cGLD", celo),
            transfer(ZERO_ADDRESS, USER, "cUSD", dollars),
        ],
    );
    world.records.push(exchange);
}

#[given(expr = "a payment of {int} {word} to a friend at {int} seconds")]
async fn payment_sent(world: &mut FeedWorld, amount: i64, token: String, secs: i64) {
    let payment = record(world, secs, vec![transfer(USER, FRIEND, &token, amount)]);
    world.records.push(payment);
}

#[given(expr = "a payment of {int} {word} from a friend at {int} seconds")]
async fn payment_received(world: &mut FeedWorld, amount: i64, token: String, secs: i64) {
    let payment = record(world, secs, vec![transfer(FRIEND, USER, &token, amount)]);
    world.records.push(payment);
}

#[given(expr = "a transfer between strangers at {int} seconds")]
async fn strangers(world: &mut FeedWorld, secs: i64) {
    let unrelated = record(
        world,
        secs,
        vec![transfer("0x1111", "0x2222", "cUSD", 1)],
    );
    world.records.push(unrelated);
}

// =============================
// Feed Steps
// =============================

async fn request_feed(world: &mut FeedWorld, local_currency_code: Option<String>) {
    let service = world.feed_service();
    let mut query = TokenTransactionsQuery::new(USER);
    query.local_currency_code = local_currency_code;
    match service.get_token_transactions(&query).await {
        Ok(events) => world.events = events,
        Err(e) => world.last_error = Some(e.to_string()),
    }
    world.unknown_transactions = service.unknown_transactions();
}

#[when("I request the feed")]
async fn feed(world: &mut FeedWorld) {
    request_feed(world, None).await;
}

#[when(expr = "I request the feed in {word}")]
async fn feed_in(world: &mut FeedWorld, currency: String) {
    request_feed(world, Some(currency)).await;
}

#[then(expr = "the feed has {int} event(s)")]
async fn feed_size(world: &mut FeedWorld, expected: usize) {
    assert_eq!(world.events.len(), expected, "error: {:?}", world.last_error);
}

#[then(expr = "event {int} is a {word} of {word} {word}")]
async fn event_is(world: &mut FeedWorld, position: usize, event_type: String, amount: String, currency: String) {
    let event = &world.events[position - 1];
    let actual_type = serde_json::to_value(event.event_type()).expect("Event type serializes");
    assert_eq!(actual_type, serde_json::Value::String(event_type));
    assert_eq!(event.amount().value, BigDecimal::from_str(&amount).expect("Invalid amount"));
    assert_eq!(event.currency_code(), currency);
}

#[then(expr = "event {int} carries {int} fee(s)")]
async fn event_fees(world: &mut FeedWorld, position: usize, expected: usize) {
    let json = serde_json::to_value(&world.events[position - 1]).expect("Event serializes");
    let fees = json["fees"].as_array().map(|f| f.len()).unwrap_or(0);
    assert_eq!(fees, expected);
}

#[then(expr = "event {int} is worth {word} {word}")]
async fn event_local_value(world: &mut FeedWorld, position: usize, value: String, currency: String) {
    let local = world.events[position - 1]
        .amount()
        .local_amount
        .as_ref()
        .expect("Local amount missing");
    assert_eq!(local.value, BigDecimal::from_str(&value).expect("Invalid value"));
    assert_eq!(local.currency_code, currency);
}

#[then(expr = "{int} transaction(s) was/were not classified")]
async fn unclassified(world: &mut FeedWorld, expected: u64) {
    assert_eq!(world.unknown_transactions, expected);
}

#[then(expr = "the feed fails with {string}")]
async fn feed_fails(world: &mut FeedWorld, message: String) {
    assert_eq!(world.last_error.as_deref(), Some(message.as_str()));
}

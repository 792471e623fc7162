use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

use super::error::ClassificationError;
use super::formatting::{base_units_to_decimal, parse_base_units};
use super::transaction::Transaction;
use super::types::{Event, EventType, ExchangeEvent, Fee, FormattedFee, MoneyAmount, TransferEvent};
use crate::models::Transfer;
use crate::models::currency::{NATIVE_CURRENCY, STABLE_USD, is_native};
use crate::sources::DisplayNameDirectory;

/// Key of the implied native/stable rate attached to exchanges.
pub const IMPLIED_RATE_PAIR: &str = "cGLD/cUSD";

/// Maps classified transactions onto feed events.
pub struct EventBuilder<'a> {
    directory: &'a dyn DisplayNameDirectory,
}

impl<'a> EventBuilder<'a> {
    pub fn new(directory: &'a dyn DisplayNameDirectory) -> Self {
        Self { directory }
    }

    /// Build a transfer-shaped event. A non-empty `fees` marks the event as
    /// outgoing and negates the amount.
    pub fn transfer_event(
        &self,
        transaction: &Transaction,
        transfer: &Transfer,
        event_type: EventType,
        address: &str,
        account: Option<&str>,
        fees: &[Fee],
    ) -> Result<Event, ClassificationError> {
        let mut value = token_amount(transfer)?;
        if !fees.is_empty() {
            value = -value;
        }

        let display = self.directory.lookup(address);

        TransferEventBuilder::new()
            .event_type(event_type)
            .transaction(transaction)
            .counterparty(address, account)
            .amount(MoneyAmount::new(value, &transfer.token, transaction.timestamp))
            .fees(format_fees(fees, transaction.timestamp))
            .display(
                display.as_ref().and_then(|d| d.name.clone()),
                display.and_then(|d| d.image_url),
            )
            .build()
    }

    /// Build an exchange-shaped event, or `None` when neither leg is a token of interest.
    pub fn exchange_event(
        &self,
        transaction: &Transaction,
        in_transfer: &Transfer,
        out_transfer: &Transfer,
        tokens_of_interest: &[String],
        fees: &[Fee],
    ) -> Result<Option<Event>, ClassificationError> {
        let Some(token) = choose_token_to_show_in_exchange(&in_transfer.token, &out_transfer.token, tokens_of_interest)
        else {
            return Ok(None);
        };

        let in_value = token_amount(in_transfer)?;
        let out_value = token_amount(out_transfer)?;
        let implied_rates = implied_exchange_rates(in_transfer, &in_value, out_transfer, &out_value);
        let timestamp = transaction.timestamp;

        let amount = if token == in_transfer.token {
            MoneyAmount::new(-in_value.clone(), &in_transfer.token, timestamp)
        } else {
            MoneyAmount::new(out_value.clone(), &out_transfer.token, timestamp)
        };

        Ok(Some(Event::Exchange(ExchangeEvent {
            event_type: EventType::Exchange,
            timestamp,
            block: transaction.block,
            hash: transaction.hash.clone(),
            amount: amount.with_implied_rates(implied_rates.clone()),
            maker_amount: MoneyAmount::new(in_value, &in_transfer.token, timestamp)
                .with_implied_rates(implied_rates.clone()),
            taker_amount: MoneyAmount::new(out_value, &out_transfer.token, timestamp).with_implied_rates(implied_rates),
            fees: format_fees(fees, timestamp),
        })))
    }
}

fn token_amount(transfer: &Transfer) -> Result<BigDecimal, ClassificationError> {
    Ok(base_units_to_decimal(&parse_base_units(&transfer.value)?))
}

/// Picks the currency an exchange is reported in. When both legs are of
/// interest the non-native one wins.
pub fn choose_token_to_show_in_exchange(
    in_token: &str,
    out_token: &str,
    tokens_of_interest: &[String],
) -> Option<String> {
    let wanted = |token: &str| tokens_of_interest.iter().any(|t| t == token);
    match (wanted(in_token), wanted(out_token)) {
        (true, true) if is_native(in_token) => Some(out_token.to_string()),
        (true, _) => Some(in_token.to_string()),
        (false, true) => Some(out_token.to_string()),
        (false, false) => None,
    }
}

/// cUSD per cGLD, present only for native/cUSD exchanges with non-zero legs.
fn implied_exchange_rates(
    in_transfer: &Transfer,
    in_value: &BigDecimal,
    out_transfer: &Transfer,
    out_value: &BigDecimal,
) -> Option<BTreeMap<String, BigDecimal>> {
    let zero = BigDecimal::from(0i64);
    let rate = match (in_transfer.token.as_str(), out_transfer.token.as_str()) {
        (NATIVE_CURRENCY, STABLE_USD) if *in_value != zero => out_value / in_value,
        (STABLE_USD, NATIVE_CURRENCY) if *out_value != zero => in_value / out_value,
        _ => return None,
    };
    Some(BTreeMap::from([(IMPLIED_RATE_PAIR.to_string(), rate)]))
}

/// Convert base-unit fees into whole-token fees stamped with the event time.
pub fn format_fees(fees: &[Fee], timestamp: i64) -> Vec<FormattedFee> {
    fees.iter()
        .map(|fee| FormattedFee {
            fee_type: fee.fee_type,
            currency_code: fee.currency_code.clone(),
            value: base_units_to_decimal(&fee.value),
            timestamp,
        })
        .collect()
}

impl MoneyAmount {
    pub fn new(value: BigDecimal, currency_code: &str, timestamp: i64) -> Self {
        Self {
            value,
            currency_code: currency_code.to_string(),
            timestamp,
            implied_exchange_rates: None,
            local_amount: None,
        }
    }

    pub fn with_implied_rates(mut self, rates: Option<BTreeMap<String, BigDecimal>>) -> Self {
        self.implied_exchange_rates = rates;
        self
    }
}

#[derive(Debug, Default)]
struct TransferEventBuilder {
    event_type: Option<EventType>,
    timestamp: Option<i64>,
    block: Option<u64>,
    hash: Option<String>,
    address: Option<String>,
    account: Option<String>,
    amount: Option<MoneyAmount>,
    fees: Vec<FormattedFee>,
    default_name: Option<String>,
    default_image: Option<String>,
}

impl TransferEventBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    fn transaction(mut self, transaction: &Transaction) -> Self {
        self.timestamp = Some(transaction.timestamp);
        self.block = Some(transaction.block);
        self.hash = Some(transaction.hash.clone());
        self
    }

    fn counterparty(mut self, address: &str, account: Option<&str>) -> Self {
        self.address = Some(address.to_string());
        self.account = account.map(str::to_string);
        self
    }

    fn amount(mut self, amount: MoneyAmount) -> Self {
        self.amount = Some(amount);
        self
    }

    fn fees(mut self, fees: Vec<FormattedFee>) -> Self {
        self.fees = fees;
        self
    }

    fn display(mut self, name: Option<String>, image: Option<String>) -> Self {
        self.default_name = name;
        self.default_image = image;
        self
    }

    fn build(self) -> Result<Event, ClassificationError> {
        let event_type = self.event_type.ok_or(ClassificationError::IncompleteEvent("type"))?;
        let hash = self.hash.ok_or(ClassificationError::IncompleteEvent("hash"))?;
        let amount = self.amount.ok_or(ClassificationError::IncompleteEvent("amount"))?;

        Ok(Event::Transfer(TransferEvent {
            event_type,
            timestamp: self.timestamp.unwrap_or_default(),
            block: self.block.unwrap_or_default(),
            hash,
            address: self.address.unwrap_or_default(),
            account: self.account,
            amount,
            fees: self.fees,
            default_name: self.default_name,
            default_image: self.default_image,
        }))
    }
}

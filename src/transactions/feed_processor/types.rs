use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::Serialize;

use super::formatting::{serialize_plain, serialize_rates};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Sent,
    Received,
    Exchange,
    EscrowSent,
    EscrowReceived,
    VerificationFee,
    Faucet,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeType {
    SecurityFee,
    GatewayFee,
    OneTimeEncryptionFee,
}

/// A fee paid by a transaction, in base units of `currency_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fee {
    pub fee_type: FeeType,
    pub currency_code: String,
    pub value: BigDecimal,
}

/// A fee as it appears on an event, in whole tokens.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFee {
    #[serde(rename = "type")]
    pub fee_type: FeeType,
    pub currency_code: String,
    #[serde(serialize_with = "serialize_plain")]
    pub value: BigDecimal,
    pub timestamp: i64,
}

/// Value of an amount in the caller's local currency.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalAmount {
    #[serde(serialize_with = "serialize_plain")]
    pub value: BigDecimal,
    pub currency_code: String,
    #[serde(serialize_with = "serialize_plain")]
    pub exchange_rate: BigDecimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoneyAmount {
    /// Signed amount in whole tokens.
    #[serde(serialize_with = "serialize_plain")]
    pub value: BigDecimal,
    pub currency_code: String,
    pub timestamp: i64,
    /// Rates implied by the transaction itself, keyed "FROM/TO".
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_rates")]
    pub implied_exchange_rates: Option<BTreeMap<String, BigDecimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_amount: Option<LocalAmount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: i64,
    pub block: u64,
    pub hash: String,
    /// Counterparty address.
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub amount: MoneyAmount,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fees: Vec<FormattedFee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: i64,
    pub block: u64,
    pub hash: String,
    pub amount: MoneyAmount,
    /// The leg given up, always positive.
    pub maker_amount: MoneyAmount,
    /// The leg received, always positive.
    pub taker_amount: MoneyAmount,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fees: Vec<FormattedFee>,
}

/// One entry of the token feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Event {
    Transfer(TransferEvent),
    Exchange(ExchangeEvent),
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Transfer(e) => e.event_type,
            Self::Exchange(e) => e.event_type,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Transfer(e) => e.timestamp,
            Self::Exchange(e) => e.timestamp,
        }
    }

    pub fn amount(&self) -> &MoneyAmount {
        match self {
            Self::Transfer(e) => &e.amount,
            Self::Exchange(e) => &e.amount,
        }
    }

    /// Every amount carried by the event, headline amount first.
    pub fn amounts(&self) -> Vec<&MoneyAmount> {
        match self {
            Self::Transfer(e) => vec![&e.amount],
            Self::Exchange(e) => vec![&e.amount, &e.maker_amount, &e.taker_amount],
        }
    }

    /// Mutable counterpart of [`Event::amounts`], in the same order.
    pub fn amounts_mut(&mut self) -> Vec<&mut MoneyAmount> {
        match self {
            Self::Transfer(e) => vec![&mut e.amount],
            Self::Exchange(e) => vec![&mut e.amount, &mut e.maker_amount, &mut e.taker_amount],
        }
    }

    pub fn currency_code(&self) -> &str {
        &self.amount().currency_code
    }
}

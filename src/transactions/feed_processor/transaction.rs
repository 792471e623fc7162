use bigdecimal::BigDecimal;

use super::error::TransactionParseError;
use super::formatting::parse_base_units;
use super::input::Input;
use super::transfers::TransferCollection;
use super::types::{Fee, FeeType};
use crate::models::RawTransactionRecord;
use crate::models::currency::{NATIVE_CURRENCY, normalize_currency_code};

/// A raw record after validation, scoped to one feed request.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub hash: String,
    pub block: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub fees: Vec<Fee>,
    pub input: Input,
    pub transfers: TransferCollection,
}

impl Transaction {
    pub fn from_raw(raw: RawTransactionRecord) -> Result<Self, TransactionParseError> {
        let hash = raw.transaction_hash.to_lowercase();
        let invalid = |field: &'static str, reason: String| TransactionParseError::InvalidField {
            hash: hash.clone(),
            field,
            reason,
        };

        let gas_price = parse_base_units(&raw.gas_price).map_err(|e| invalid("gasPrice", e.to_string()))?;
        let gas_used = parse_base_units(&raw.gas_used).map_err(|e| invalid("gasUsed", e.to_string()))?;
        let fee_currency = raw
            .fee_token
            .as_deref()
            .map(normalize_currency_code)
            .unwrap_or_else(|| NATIVE_CURRENCY.to_string());

        let mut fees = vec![Fee {
            fee_type: FeeType::SecurityFee,
            currency_code: fee_currency.clone(),
            value: gas_price * gas_used,
        }];

        let has_recipient = raw.gateway_fee_recipient.as_deref().is_some_and(|r| !r.is_empty());
        if has_recipient && let Some(gateway_fee) = raw.gateway_fee.as_deref() {
            let value = parse_base_units(gateway_fee).map_err(|e| invalid("gatewayFee", e.to_string()))?;
            if value != BigDecimal::from(0i64) {
                fees.push(Fee {
                    fee_type: FeeType::GatewayFee,
                    currency_code: fee_currency,
                    value,
                });
            }
        }

        let mut transfers = Vec::with_capacity(raw.transfers.len());
        for transfer in raw.transfers {
            parse_base_units(&transfer.value).map_err(|e| invalid("transfers.value", e.to_string()))?;
            transfers.push(transfer.normalized());
        }

        let input = Input::from_string(&raw.input)
            .map_err(|source| TransactionParseError::InvalidInput {
                hash: hash.clone(),
                source,
            })?
            .with_target(raw.to_address_hash);

        Ok(Self {
            block: raw.block_number,
            timestamp: raw.timestamp.timestamp_millis(),
            fees,
            input,
            transfers: TransferCollection::new(transfers),
            hash,
        })
    }
}

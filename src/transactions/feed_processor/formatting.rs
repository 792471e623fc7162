use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serializer;

use super::error::ClassificationError;

/// Decimal places of every token the feed reports.
pub const TOKEN_DECIMALS: i64 = 18;

/// Parse an unsigned base-unit integer string.
pub fn parse_base_units(value: &str) -> Result<BigDecimal, ClassificationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClassificationError::InvalidAmount(value.to_string()));
    }
    BigDecimal::from_str(value).map_err(|_| ClassificationError::InvalidAmount(value.to_string()))
}

/// Shift a base-unit amount into whole tokens. Exact, no rounding.
pub fn base_units_to_decimal(value: &BigDecimal) -> BigDecimal {
    let (digits, scale) = value.as_bigint_and_exponent();
    BigDecimal::new(digits, scale + TOKEN_DECIMALS)
}

/// Render a decimal as fixed-point text without exponent or trailing zeros
/// (e.g. "12.34567890123456789", "-0.5", "200").
pub fn to_plain_string(value: &BigDecimal) -> String {
    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    let raw = digits.to_string();
    let (sign, magnitude) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", raw),
    };

    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{sign}{magnitude}{zeros}");
    }

    let scale = scale as usize;
    if magnitude.len() > scale {
        let (whole, fraction) = magnitude.split_at(magnitude.len() - scale);
        format!("{sign}{whole}.{fraction}")
    } else {
        let padding = "0".repeat(scale - magnitude.len());
        format!("{sign}0.{padding}{magnitude}")
    }
}

pub fn serialize_plain<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_plain_string(value))
}

pub fn serialize_rates<S: Serializer>(
    rates: &Option<BTreeMap<String, BigDecimal>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match rates {
        Some(rates) => serializer.collect_map(rates.iter().map(|(pair, rate)| (pair, to_plain_string(rate)))),
        None => serializer.serialize_none(),
    }
}

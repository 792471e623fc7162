/// Currency code of the native asset.
pub const NATIVE_CURRENCY: &str = "cGLD";
/// Alternative spelling of the native asset accepted on input.
pub const NATIVE_CURRENCY_ALIAS: &str = "CELO";
pub const STABLE_USD: &str = "cUSD";
pub const STABLE_EUR: &str = "cEUR";
pub const USD: &str = "USD";

/// Stability-token prefix stripped by [`fiat_of`].
const STABLE_TOKEN_PREFIX: char = 'c';

/// Currencies reported when a feed request names no tokens.
pub const LEGACY_TOKENS: [&str; 2] = [STABLE_USD, NATIVE_CURRENCY];

pub const STABLE_TOKENS: [&str; 2] = [STABLE_USD, STABLE_EUR];

pub fn normalize_currency_code(code: &str) -> String {
    if code.eq_ignore_ascii_case(NATIVE_CURRENCY_ALIAS) || code.eq_ignore_ascii_case(NATIVE_CURRENCY) {
        NATIVE_CURRENCY.to_string()
    } else {
        code.to_string()
    }
}

pub fn is_native(code: &str) -> bool {
    code == NATIVE_CURRENCY
}

pub fn is_stable_token(code: &str) -> bool {
    STABLE_TOKENS.contains(&code)
}

/// Returns the fiat currency a stable token tracks, e.g. "cUSD" -> "USD".
///
/// Codes that do not carry the stability prefix are returned unchanged.
pub fn fiat_of(code: &str) -> String {
    code.strip_prefix(STABLE_TOKEN_PREFIX).unwrap_or(code).to_string()
}

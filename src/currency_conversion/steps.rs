use crate::models::currency::{NATIVE_CURRENCY, STABLE_USD, USD, fiat_of, is_native, is_stable_token};

/// The currencies a conversion from `from` to `to` passes through, both ends included.
///
/// Empty when `from == to`. Adjacent duplicates are collapsed, so every
/// window of two is a real hop.
pub fn get_conversion_steps(from: &str, to: &str) -> Vec<String> {
    if from == to {
        return Vec::new();
    }

    let steps = if is_native(from) && !is_stable_token(to) {
        native_to_fiat(to)
    } else if is_native(to) && !is_stable_token(from) {
        let mut steps = native_to_fiat(from);
        steps.reverse();
        steps
    } else if is_stable_token(from) && !is_native(to) {
        if is_stable_token(to) {
            vec![from.to_string(), fiat_of(from), fiat_of(to), to.to_string()]
        } else {
            vec![from.to_string(), fiat_of(from), to.to_string()]
        }
    } else if is_stable_token(to) && !is_native(from) {
        vec![from.to_string(), fiat_of(to), to.to_string()]
    } else {
        vec![from.to_string(), to.to_string()]
    };

    dedup_adjacent(steps)
}

/// Native to any non-stable currency goes through the USD stable token.
fn native_to_fiat(currency: &str) -> Vec<String> {
    let mut steps = vec![NATIVE_CURRENCY.to_string(), STABLE_USD.to_string()];
    if currency != USD {
        steps.push(USD.to_string());
    }
    steps.push(currency.to_string());
    steps
}

fn dedup_adjacent(mut steps: Vec<String>) -> Vec<String> {
    steps.dedup();
    steps
}

//! Monetary rules shared by the cart and checkout paths.
//!
//! Every amount is held as a `BigDecimal` with two fractional digits,
//! rounded half-up before it is stored or used in arithmetic.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::Value;

pub const MONEY_SCALE: i64 = 2;

pub fn zero() -> BigDecimal {
    BigDecimal::from(0).with_scale(MONEY_SCALE)
}

pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

/// Rounds a stored or catalog price; negatives collapse to 0.00.
pub fn normalize_price(value: &BigDecimal) -> BigDecimal {
    if *value < BigDecimal::from(0) {
        return zero();
    }
    round_money(value)
}

/// Reads a client-supplied price. Anything that is not a non-negative
/// number (or a numeric string) becomes 0.00 instead of an error.
pub fn price_from_json(value: &Value) -> BigDecimal {
    let parsed = match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    };
    parsed.map(|p| normalize_price(&p)).unwrap_or_else(zero)
}

pub fn line_total(quantity: i32, unit_price: &BigDecimal) -> BigDecimal {
    round_money(&(round_money(unit_price) * BigDecimal::from(quantity)))
}

/// Sums already-rounded amounts and rounds the result.
pub fn sum_money<'a, I>(amounts: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    let total = amounts
        .into_iter()
        .fold(BigDecimal::from(0), |acc, amount| acc + round_money(amount));
    round_money(&total)
}

//! Decimal arithmetic utilities for USD amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an upstream BigDecimal string, accepting plain or scientific notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Safe division that returns zero if the divisor is zero or the quotient overflows.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Sum a projected field over a slice.
pub fn sum_by<T>(items: &[T], field: impl Fn(&T) -> Decimal) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(field(item)))
}

/// Render a decimal without trailing zeros (e.g. `3.000` -> `3`, `0.500` -> `0.5`).
pub fn to_plain_string(value: Decimal) -> String {
    value.normalize().to_string()
}

//! Type definitions for the DefiLlama coins API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /prices`.
#[derive(Debug, Clone, Serialize)]
pub struct PricesRequest<'a> {
    /// `"<chain>:<address>"` keys
    pub coins: &'a [String],
}

/// Response of `POST /prices`.
#[derive(Debug, Clone, Deserialize)]
pub struct PricesResponse {
    #[serde(default)]
    pub coins: HashMap<String, CoinPrice>,
}

/// Current price of a single token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    /// Unix seconds of the last price update
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Composite key the pricing service expects for a token.
pub fn coin_key(chain: &str, address: &str) -> String {
    format!("{}:{}", chain, address)
}

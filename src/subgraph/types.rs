//! Type definitions for Gamma subgraph responses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::utils::decimal::parse_decimal;

/// GraphQL request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` payload of the hypervisors query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypervisorsData {
    pub uniswap_v3_hypervisors: Vec<Hypervisor>,
}

/// A Gamma vault managing a Uniswap V3 position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hypervisor {
    /// Vault contract address
    pub id: String,
    /// Vault share token symbol
    pub symbol: String,
    /// Creation timestamp (seconds)
    #[serde(deserialize_with = "deserialize_int")]
    pub created: i64,
    pub pool: Pool,
    /// Most recent first, at most 100
    #[serde(default)]
    pub rebalances: Vec<Rebalance>,
}

impl Hypervisor {
    /// Addresses of both pool tokens, token0 first.
    pub fn token_addresses(&self) -> [&str; 2] {
        [self.pool.token0.id.as_str(), self.pool.token1.id.as_str()]
    }
}

/// Underlying Uniswap V3 pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pool {
    pub token0: Token,
    pub token1: Token,
    /// Fee tier in hundred-thousandths (3000 = 0.3%)
    #[serde(deserialize_with = "deserialize_int")]
    pub fee: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Token {
    /// Token contract address
    pub id: String,
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_int")]
    pub decimals: u8,
}

/// A single rebalance of a vault's position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rebalance {
    /// Block timestamp (seconds)
    #[serde(deserialize_with = "deserialize_int")]
    pub timestamp: i64,
    /// USD volume moved in this rebalance
    #[serde(rename = "totalAmountUSD", deserialize_with = "deserialize_decimal")]
    pub total_amount_usd: Decimal,
    /// Gross USD fees collected since the previous rebalance
    #[serde(rename = "grossFeesUSD", deserialize_with = "deserialize_decimal")]
    pub gross_fees_usd: Decimal,
}

impl Rebalance {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

// Custom deserializers for the subgraph's string-encoded BigInt/BigDecimal fields

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match StrOrNumber::deserialize(deserializer)? {
        StrOrNumber::Str(s) => parse_decimal(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal '{}'", s))),
        StrOrNumber::Int(n) => Ok(Decimal::from(n)),
        StrOrNumber::Float(f) => Decimal::try_from(f).map_err(serde::de::Error::custom),
    }
}

fn deserialize_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
    <T as FromStr>::Err: Display,
{
    match StrOrNumber::deserialize(deserializer)? {
        StrOrNumber::Str(s) => s.trim().parse::<T>().map_err(serde::de::Error::custom),
        StrOrNumber::Int(n) => T::try_from(n)
            .map_err(|_| serde::de::Error::custom(format!("integer {} out of range", n))),
        StrOrNumber::Float(f) => Err(serde::de::Error::custom(format!(
            "expected integer, got {}",
            f
        ))),
    }
}

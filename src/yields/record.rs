//! Output record for one vault.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Project tag attached to every record.
pub const PROJECT: &str = "visor";

/// Fee yield estimate for a single vault, in the yields-server pool format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolYieldRecord {
    /// Vault address
    pub pool: String,
    /// Display chain label
    pub chain: String,
    pub project: String,
    /// `token0-token1`
    pub symbol: String,
    /// Estimated average TVL in USD
    #[serde(with = "rust_decimal::serde::float")]
    pub tvl_usd: Decimal,
    /// Annualized fee yield as a fraction (0.05 = 5%)
    #[serde(with = "rust_decimal::serde::float")]
    pub apy_base: Decimal,
    pub underlying_tokens: Vec<String>,
    /// Fee tier label, e.g. `0.3 univ3 pool`
    pub pool_meta: String,
}

//! Fee yield estimation from rebalance history.
//!
//! Each rebalance reports the USD volume it moved and the gross fees earned
//! since the previous one. Over the observed window:
//!
//! - average TVL = (Σ volume − Σ fees) / n, or Σ volume / n when fees are not
//!   smaller than volume
//! - yearly fees = Σ fees / window seconds × seconds per year
//! - APR = yearly fees / average TVL
//!
//! Any division by zero yields 0 for the affected figure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace};

use super::record::{PoolYieldRecord, PROJECT};
use crate::subgraph::{Hypervisor, Rebalance};
use crate::utils::decimal::{safe_div, sum_by, to_plain_string};
use crate::utils::format_chain;

/// 365 days, no leap adjustment.
pub const SECONDS_PER_YEAR: i64 = 60 * 60 * 24 * 365;

/// Suffix of the fee tier label.
pub const POOL_TYPE_SUFFIX: &str = "univ3 pool";

/// Intermediate figures for one vault.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultYield {
    pub aggregated_tvl: Decimal,
    pub aggregated_fees: Decimal,
    pub seconds_elapsed: i64,
    pub average_tvl: Decimal,
    pub yearly_fees: Decimal,
    pub apr: Decimal,
}

/// Compute yield figures from rebalances ordered most recent first.
///
/// Returns `None` with fewer than two rebalances, since no window exists.
pub fn compute_vault_yield(rebalances: &[Rebalance]) -> Option<VaultYield> {
    let (first, last) = match rebalances {
        [first, .., last] => (first, last),
        _ => return None,
    };

    let count = Decimal::from(rebalances.len());
    let aggregated_tvl = sum_by(rebalances, |r| r.total_amount_usd);
    let aggregated_fees = sum_by(rebalances, |r| r.gross_fees_usd);
    let seconds_elapsed = first.timestamp.saturating_sub(last.timestamp);

    let average_tvl = if aggregated_tvl > aggregated_fees {
        safe_div(aggregated_tvl - aggregated_fees, count)
    } else {
        safe_div(aggregated_tvl, count)
    };

    // A non-positive window means the history is unusable for annualizing
    let yearly_fees = if seconds_elapsed > 0 {
        safe_div(aggregated_fees, Decimal::from(seconds_elapsed))
            .checked_mul(Decimal::from(SECONDS_PER_YEAR))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let apr = safe_div(yearly_fees, average_tvl);

    Some(VaultYield {
        aggregated_tvl,
        aggregated_fees,
        seconds_elapsed,
        average_tvl,
        yearly_fees,
        apr,
    })
}

/// Fee tier label, e.g. 3000 -> `3 univ3 pool`, 500 -> `0.5 univ3 pool`.
pub fn fee_tier_label(fee: u32) -> String {
    let percent = Decimal::from(fee) / dec!(1000);
    format!("{} {}", to_plain_string(percent), POOL_TYPE_SUFFIX)
}

/// Build the output record for a vault, or `None` if it lacks history.
pub fn vault_record(chain: &str, hypervisor: &Hypervisor) -> Option<PoolYieldRecord> {
    let figures = compute_vault_yield(&hypervisor.rebalances)?;
    let pool = &hypervisor.pool;

    if let (Some(newest), Some(oldest)) = (
        hypervisor.rebalances.first().and_then(Rebalance::time),
        hypervisor.rebalances.last().and_then(Rebalance::time),
    ) {
        trace!(
            vault = %hypervisor.id,
            from = %oldest,
            to = %newest,
            "Rebalance window"
        );
    }

    Some(PoolYieldRecord {
        pool: hypervisor.id.clone(),
        chain: format_chain(chain),
        project: PROJECT.to_string(),
        symbol: format!("{}-{}", pool.token0.symbol, pool.token1.symbol),
        tvl_usd: figures.average_tvl,
        apy_base: figures.apr,
        underlying_tokens: vec![pool.token0.id.clone(), pool.token1.id.clone()],
        pool_meta: fee_tier_label(pool.fee),
    })
}

/// Records for every qualifying vault on a chain, in input order.
pub fn chain_records(chain: &str, hypervisors: &[Hypervisor]) -> Vec<PoolYieldRecord> {
    let records: Vec<PoolYieldRecord> = hypervisors
        .iter()
        .filter_map(|hv| vault_record(chain, hv))
        .collect();

    debug!(
        chain,
        vaults = hypervisors.len(),
        qualifying = records.len(),
        "Computed chain yields"
    );

    records
}

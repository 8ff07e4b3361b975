//! Flattening per-chain results into the final output.

use super::record::PoolYieldRecord;

/// Concatenate per-chain records, keeping chain order then vault order.
pub fn assemble(per_chain: Vec<Vec<PoolYieldRecord>>) -> Vec<PoolYieldRecord> {
    per_chain.into_iter().flatten().collect()
}

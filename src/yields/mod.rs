//! Yield computation stages of the pipeline.
//!
//! - Token collection for the batched price lookup
//! - Per-vault fee yield estimation
//! - Flattening per-chain results into one ordered list

mod assembler;
pub(crate) mod calculator;
mod collector;
mod record;

pub use assembler::assemble;
pub use calculator::{
    chain_records, compute_vault_yield, fee_tier_label, vault_record, VaultYield,
    POOL_TYPE_SUFFIX, SECONDS_PER_YEAR,
};
pub use collector::{collect_tokens, price_keys, ChainHypervisors, ChainTokens};
pub use record::{PoolYieldRecord, PROJECT};

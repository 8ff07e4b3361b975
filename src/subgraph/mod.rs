//! Gamma subgraph integration.
//!
//! One deployment per chain, all under the same indexer org. Each query
//! returns the active hypervisors (nonzero TVL and share supply) with their
//! pool tokens, fee tier and most recent rebalances.

mod client;
mod types;

pub use client::{SubgraphClient, HYPERVISORS_QUERY};
pub use types::*;

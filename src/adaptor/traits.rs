//! Source-agnostic traits for the yield pipeline.
//!
//! The pipeline only needs two things from the outside world:
//! - the vaults (with rebalance history) of one chain
//! - current prices for a batch of `"<chain>:<address>"` keys
//!
//! Implement these to run the computation against other backends.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::prices::CoinPrice;
use crate::registry::ChainEntry;
use crate::subgraph::Hypervisor;
use crate::yields::PoolYieldRecord;

/// Provider of vault data for a chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HypervisorSource: Send + Sync {
    /// Fetch all active vaults on the chain, rebalances most recent first.
    async fn fetch_hypervisors(&self, chain: &ChainEntry) -> Result<Vec<Hypervisor>>;
}

/// Provider of current token prices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch prices for every key in one batch.
    async fn fetch_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>>;
}

/// Static metadata an external harness reads before calling [`YieldAdaptor::apy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdaptorDescriptor {
    /// Whether the adaptor can compute yields as of a past timestamp
    pub timetravel: bool,
    /// Dashboard for the underlying protocol
    pub url: &'static str,
}

/// A computation producing pool yield records.
#[async_trait]
pub trait YieldAdaptor: Send + Sync {
    /// Static descriptor for this adaptor.
    fn descriptor(&self) -> AdaptorDescriptor;

    /// Compute current yields for every qualifying pool.
    async fn apy(&self) -> Result<Vec<PoolYieldRecord>>;
}

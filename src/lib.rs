//! # Visor Yield
//!
//! Fee yield estimates for Gamma hypervisor vaults across chains, computed
//! from subgraph rebalance history.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `registry`: Static chain → subgraph slug / chain id table
//! - `subgraph`: Gamma subgraph GraphQL client and response types
//! - `prices`: DefiLlama batched price client
//! - `yields`: Token collection, yield calculation, result assembly
//! - `adaptor`: The pipeline entry point and its descriptor
//! - `utils`: Decimal helpers, chain labels, retry

pub mod adaptor;
pub mod config;
pub mod error;
pub mod prices;
pub mod registry;
pub mod subgraph;
pub mod utils;
pub mod yields;

pub use adaptor::{GammaAdaptor, YieldAdaptor};
pub use config::Config;
pub use yields::PoolYieldRecord;

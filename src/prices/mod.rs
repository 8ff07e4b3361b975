//! Token pricing via the DefiLlama coins API.
//!
//! All tokens across all chains are priced in a single batched request keyed
//! by `"<chain>:<address>"`.

mod client;
mod types;

pub use client::LlamaPriceClient;
pub use types::*;

//! Shared utilities: decimal arithmetic, chain labels, retry.

pub mod chain;
pub mod decimal;
pub mod retry;

pub use chain::format_chain;

//! Token collection for the price lookup.

use std::collections::HashSet;

use crate::prices::coin_key;
use crate::subgraph::Hypervisor;

/// Vaults fetched for one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainHypervisors {
    pub chain: &'static str,
    pub hypervisors: Vec<Hypervisor>,
}

/// Distinct token addresses referenced by a chain's vault pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTokens {
    pub chain: &'static str,
    /// First-seen order, no duplicates
    pub tokens: Vec<String>,
}

/// Deduplicate both pool tokens of every vault, per chain.
pub fn collect_tokens(fetched: &[ChainHypervisors]) -> Vec<ChainTokens> {
    fetched
        .iter()
        .map(|entry| {
            let mut seen = HashSet::new();
            let tokens = entry
                .hypervisors
                .iter()
                .flat_map(Hypervisor::token_addresses)
                .filter(|addr| seen.insert(*addr))
                .map(str::to_string)
                .collect();

            ChainTokens {
                chain: entry.chain,
                tokens,
            }
        })
        .collect()
}

/// Pricing-service keys for every collected token across all chains.
pub fn price_keys(tokens: &[ChainTokens]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|ct| ct.tokens.iter().map(move |t| coin_key(ct.chain, t)))
        .collect()
}

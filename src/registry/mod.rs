//! Static chain registry.
//!
//! Maps each supported logical chain name to its Gamma subgraph slug and EVM
//! chain id. The table is fixed at compile time; a registry can only be
//! narrowed to a subset of it.

use anyhow::Result;
use serde::Serialize;

/// One supported chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainEntry {
    /// Logical chain name, also the pricing-service key prefix
    pub name: &'static str,
    /// Subgraph deployment slug under the indexer org
    pub slug: &'static str,
    /// EVM chain id
    pub chain_id: u64,
}

const CHAINS: &[ChainEntry] = &[
    ChainEntry {
        name: "ethereum",
        slug: "gamma",
        chain_id: 1,
    },
    ChainEntry {
        name: "optimism",
        slug: "optimism",
        chain_id: 10,
    },
    ChainEntry {
        name: "polygon",
        slug: "polygon",
        chain_id: 137,
    },
    ChainEntry {
        name: "arbitrum",
        slug: "arbitrum",
        chain_id: 42161,
    },
    ChainEntry {
        name: "celo",
        slug: "celo",
        chain_id: 42220,
    },
];

/// Ordered, immutable set of chains the pipeline runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    entries: Vec<ChainEntry>,
}

impl ChainRegistry {
    /// Registry holding every supported chain, in canonical order.
    pub fn builtin() -> Self {
        Self {
            entries: CHAINS.to_vec(),
        }
    }

    /// Registry built from explicit entries. Used by tests and embedders.
    pub fn from_entries(entries: Vec<ChainEntry>) -> Self {
        Self { entries }
    }

    /// Narrow the registry to the named chains, keeping canonical order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        for name in names {
            anyhow::ensure!(
                self.get(name.as_ref()).is_some(),
                "Unknown chain '{}'. Supported: {}",
                name.as_ref(),
                self.names().collect::<Vec<_>>().join(", ")
            );
        }

        let entries = self
            .entries
            .iter()
            .filter(|e| names.iter().any(|n| n.as_ref() == e.name))
            .copied()
            .collect();

        Ok(Self { entries })
    }

    /// Chain names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn get(&self, chain: &str) -> Option<&ChainEntry> {
        self.entries.iter().find(|e| e.name == chain)
    }

    /// Subgraph slug for a chain.
    pub fn slug(&self, chain: &str) -> Option<&'static str> {
        self.get(chain).map(|e| e.slug)
    }

    /// EVM chain id for a chain.
    pub fn chain_id(&self, chain: &str) -> Option<u64> {
        self.get(chain).map(|e| e.chain_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

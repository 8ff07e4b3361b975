//! Configuration management for the yield adaptor.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL indexer endpoint settings
    #[serde(default)]
    pub subgraph: SubgraphConfig,
    /// Pricing service settings
    #[serde(default)]
    pub prices: PricesConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Retry policy at the fetcher boundary
    #[serde(default)]
    pub retry: RetryConfig,
    /// Pipeline failure policy
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphConfig {
    /// Indexer host, e.g. `https://api.thegraph.com`
    #[serde(default = "default_subgraph_base_url")]
    pub base_url: String,
    /// Organization segment of the subgraph path
    #[serde(default = "default_subgraph_org")]
    pub org: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricesConfig {
    /// Batched current-price endpoint
    #[serde(default = "default_prices_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries per request after the first attempt (0 = fail on first error)
    #[serde(default)]
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Drop chains whose fetch failed instead of failing the whole run
    #[serde(default)]
    pub skip_failed_chains: bool,
}

// Default value functions
fn default_subgraph_base_url() -> String {
    "https://api.thegraph.com".to_string()
}

fn default_subgraph_org() -> String {
    "gammastrategies".to_string()
}

fn default_prices_url() -> String {
    "https://coins.llama.fi/prices".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("VISOR"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.subgraph.base_url.trim().is_empty(),
            "subgraph.base_url must not be empty"
        );

        anyhow::ensure!(
            !self.subgraph.org.trim().is_empty(),
            "subgraph.org must not be empty"
        );

        anyhow::ensure!(
            !self.prices.url.trim().is_empty(),
            "prices.url must not be empty"
        );

        anyhow::ensure!(self.http.timeout_secs > 0, "http.timeout_secs must be > 0");

        anyhow::ensure!(
            self.retry.max_retries == 0 || self.retry.base_delay_ms > 0,
            "retry.base_delay_ms must be > 0 when retries are enabled"
        );

        Ok(())
    }
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_subgraph_base_url(),
            org: default_subgraph_org(),
        }
    }
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            url: default_prices_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

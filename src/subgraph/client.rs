//! Gamma subgraph GraphQL client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::*;
use crate::adaptor::HypervisorSource;
use crate::config::{Config, RetryConfig, SubgraphConfig};
use crate::error::UpstreamError;
use crate::registry::ChainEntry;
use crate::utils::retry::retry;

/// Active vaults with their pool metadata and last 100 rebalances.
pub const HYPERVISORS_QUERY: &str = r#"{
  uniswapV3Hypervisors(where: { tvl0_gt: "0", totalSupply_gt: "0" }) {
    id
    symbol
    created
    pool {
      token0 {
        symbol
        id
        decimals
      }
      token1 {
        symbol
        id
        decimals
      }
      fee
    }
    rebalances(orderBy: timestamp, orderDirection: desc, first: 100) {
      timestamp
      totalAmountUSD
      grossFeesUSD
    }
  }
}"#;

/// Client for the per-chain Gamma subgraphs.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    client: Client,
    base_url: String,
    org: String,
    retry: RetryConfig,
}

impl SubgraphClient {
    /// Create a client from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, &config.subgraph, config.retry.clone()))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(client: Client, subgraph: &SubgraphConfig, retry: RetryConfig) -> Self {
        Self {
            client,
            base_url: subgraph.base_url.trim_end_matches('/').to_string(),
            org: subgraph.org.clone(),
            retry,
        }
    }

    /// Endpoint for a subgraph slug.
    pub fn url_for(&self, slug: &str) -> String {
        format!("{}/subgraphs/name/{}/{}", self.base_url, self.org, slug)
    }

    /// Run the hypervisors query against one chain's subgraph.
    #[instrument(skip(self, chain), name = "subgraph_hypervisors", fields(chain = chain.name))]
    pub async fn get_hypervisors(&self, chain: &ChainEntry) -> Result<Vec<Hypervisor>> {
        let url = self.url_for(chain.slug);

        let data = retry(&self.retry, chain.name, || {
            self.query::<HypervisorsData>(&url, HYPERVISORS_QUERY)
        })
        .await
        .with_context(|| format!("Failed to query {} subgraph", chain.name))?;

        debug!(
            "Fetched {} hypervisors from {}",
            data.uniswap_v3_hypervisors.len(),
            url
        );

        Ok(data.uniswap_v3_hypervisors)
    }

    async fn query<T>(&self, url: &str, query: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = GraphQlRequest { query };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("Failed to send subgraph request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: "subgraph",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let data: GraphQlResponse<T> = response
            .json()
            .await
            .context("Failed to parse subgraph response")?;

        if let Some(errors) = data.errors.filter(|e| !e.is_empty()) {
            let messages = errors.into_iter().map(|e| e.message).collect();
            return Err(UpstreamError::GraphQl(messages).into());
        }

        data.data
            .ok_or_else(|| UpstreamError::MissingData("subgraph").into())
    }
}

#[async_trait]
impl HypervisorSource for SubgraphClient {
    async fn fetch_hypervisors(&self, chain: &ChainEntry) -> Result<Vec<Hypervisor>> {
        self.get_hypervisors(chain).await
    }
}

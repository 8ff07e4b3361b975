//! DefiLlama coins API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::*;
use crate::adaptor::PriceSource;
use crate::config::{Config, RetryConfig};
use crate::error::UpstreamError;
use crate::utils::retry::retry;

/// Client for batched current-price lookups.
#[derive(Debug, Clone)]
pub struct LlamaPriceClient {
    client: Client,
    url: String,
    retry: RetryConfig,
}

impl LlamaPriceClient {
    /// Create a client from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(
            client,
            &config.prices.url,
            config.retry.clone(),
        ))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(client: Client, url: &str, retry: RetryConfig) -> Self {
        Self {
            client,
            url: url.to_string(),
            retry,
        }
    }

    /// Fetch current prices for every `"<chain>:<address>"` key in one request.
    #[instrument(skip(self, coins), name = "llama_get_prices", fields(count = coins.len()))]
    pub async fn get_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>> {
        let data = retry(&self.retry, "prices", || self.post_prices(coins))
            .await
            .context("Failed to fetch token prices")?;

        debug!(
            "Fetched {} prices for {} requested coins",
            data.coins.len(),
            coins.len()
        );

        Ok(data.coins)
    }

    async fn post_prices(&self, coins: &[String]) -> Result<PricesResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(&PricesRequest { coins })
            .send()
            .await
            .context("Failed to send prices request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: "prices",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json()
            .await
            .context("Failed to parse prices response")
    }
}

#[async_trait]
impl PriceSource for LlamaPriceClient {
    async fn fetch_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>> {
        self.get_prices(coins).await
    }
}

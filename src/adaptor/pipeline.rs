//! The Gamma vault yield pipeline.
//!
//! fetch vaults per chain (concurrently) → collect tokens → price them in one
//! batch → compute per-vault yields → flatten in registry order.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::{join_all, try_join_all};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::traits::{AdaptorDescriptor, HypervisorSource, PriceSource, YieldAdaptor};
use crate::config::Config;
use crate::prices::LlamaPriceClient;
use crate::registry::ChainRegistry;
use crate::subgraph::SubgraphClient;
use crate::yields::{
    assemble, chain_records, collect_tokens, price_keys, ChainHypervisors, PoolYieldRecord,
};

/// Descriptor of the Gamma adaptor.
pub const GAMMA_DESCRIPTOR: AdaptorDescriptor = AdaptorDescriptor {
    timetravel: false,
    url: "https://app.gamma.xyz/dashboard",
};

/// Yield adaptor for Gamma hypervisors across the registry's chains.
pub struct GammaAdaptor {
    registry: ChainRegistry,
    hypervisors: Arc<dyn HypervisorSource>,
    prices: Arc<dyn PriceSource>,
    skip_failed_chains: bool,
}

impl GammaAdaptor {
    /// Create an adaptor backed by the subgraph and DefiLlama HTTP clients.
    pub fn new(config: &Config, registry: ChainRegistry) -> Result<Self> {
        let hypervisors = Arc::new(SubgraphClient::new(config)?);
        let prices = Arc::new(LlamaPriceClient::new(config)?);

        Ok(Self::with_sources(registry, hypervisors, prices)
            .skip_failed_chains(config.pipeline.skip_failed_chains))
    }

    /// Create an adaptor over arbitrary sources.
    pub fn with_sources(
        registry: ChainRegistry,
        hypervisors: Arc<dyn HypervisorSource>,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            registry,
            hypervisors,
            prices,
            skip_failed_chains: false,
        }
    }

    /// Drop failed chains from the result instead of failing the run.
    pub fn skip_failed_chains(mut self, skip: bool) -> Self {
        self.skip_failed_chains = skip;
        self
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Fetch every chain concurrently, in registry order.
    async fn fetch_all(&self) -> Result<Vec<ChainHypervisors>> {
        let fetches = self.registry.entries().iter().map(|chain| async move {
            let hypervisors = self.hypervisors.fetch_hypervisors(chain).await?;
            Ok::<_, anyhow::Error>(ChainHypervisors {
                chain: chain.name,
                hypervisors,
            })
        });

        if !self.skip_failed_chains {
            return try_join_all(fetches).await;
        }

        let results = join_all(fetches).await;
        let attempted = results.len();
        let fetched: Vec<ChainHypervisors> = results
            .into_iter()
            .zip(self.registry.names())
            .filter_map(|(result, chain)| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(chain, "Skipping chain after fetch failure: {:#}", e);
                    None
                }
            })
            .collect();

        anyhow::ensure!(
            attempted == 0 || !fetched.is_empty(),
            "All {} chain fetches failed",
            attempted
        );

        Ok(fetched)
    }

    /// Run the full pipeline.
    #[instrument(skip(self), name = "gamma_apy", fields(chains = self.registry.len()))]
    pub async fn run(&self) -> Result<Vec<PoolYieldRecord>> {
        let fetched = self.fetch_all().await?;

        let tokens = collect_tokens(&fetched);
        let keys = price_keys(&tokens);

        // Prices do not feed tvl_usd or apy_base; yields come from rebalance volume only
        let prices = self.prices.fetch_prices(&keys).await?;
        debug!(
            requested = keys.len(),
            priced = prices.len(),
            "Fetched token prices"
        );

        let per_chain: Vec<Vec<PoolYieldRecord>> = fetched
            .iter()
            .map(|entry| chain_records(entry.chain, &entry.hypervisors))
            .collect();

        let pools = assemble(per_chain);

        info!(
            chains = fetched.len(),
            vaults = fetched.iter().map(|c| c.hypervisors.len()).sum::<usize>(),
            pools = pools.len(),
            "Computed Gamma pool yields"
        );

        Ok(pools)
    }
}

#[async_trait]
impl YieldAdaptor for GammaAdaptor {
    fn descriptor(&self) -> AdaptorDescriptor {
        GAMMA_DESCRIPTOR
    }

    async fn apy(&self) -> Result<Vec<PoolYieldRecord>> {
        self.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptor::traits::{MockHypervisorSource, MockPriceSource};
    use crate::config::SubgraphConfig;
    use crate::prices::CoinPrice;
    use crate::subgraph::Hypervisor;
    use crate::yields::calculator::tests::{hypervisor, rebalance};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn history() -> Vec<crate::subgraph::Rebalance> {
        vec![
            rebalance(2_000_000, dec!(100), dec!(5)),
            rebalance(1_000_000, dec!(100), dec!(5)),
        ]
    }

    fn vaults_for(chain: &str) -> Vec<Hypervisor> {
        match chain {
            "ethereum" => vec![
                hypervisor("eth-1", 3000, history()),
                hypervisor("eth-2", 500, vec![rebalance(1, dec!(1), dec!(1))]),
                hypervisor("eth-3", 10000, history()),
            ],
            "polygon" => vec![hypervisor("poly-1", 500, history())],
            _ => Vec::new(),
        }
    }

    fn empty_prices() -> MockPriceSource {
        let mut prices = MockPriceSource::new();
        prices
            .expect_fetch_prices()
            .returning(|_| Ok(HashMap::new()));
        prices
    }

    fn adaptor(hypervisors: MockHypervisorSource, prices: MockPriceSource) -> GammaAdaptor {
        GammaAdaptor::with_sources(
            ChainRegistry::builtin(),
            Arc::new(hypervisors),
            Arc::new(prices),
        )
    }

    fn fixed_hypervisors() -> MockHypervisorSource {
        let mut source = MockHypervisorSource::new();
        source
            .expect_fetch_hypervisors()
            .returning(|chain| Ok(vaults_for(chain.name)));
        source
    }

    #[tokio::test]
    async fn test_run_flattens_in_registry_order() {
        let pools = adaptor(fixed_hypervisors(), empty_prices())
            .run()
            .await
            .unwrap();

        let ids: Vec<_> = pools.iter().map(|p| p.pool.as_str()).collect();
        assert_eq!(ids, vec!["eth-1", "eth-3", "poly-1"]);
        assert_eq!(pools[0].chain, "Ethereum");
        assert_eq!(pools[2].chain, "Polygon");
        assert_eq!(pools[0].pool_meta, "3 univ3 pool");
        assert_eq!(pools[1].pool_meta, "10 univ3 pool");
        assert_eq!(pools[0].tvl_usd, dec!(95));
        assert_eq!(pools[0].apy_base.round_dp(4), dec!(3.3196));
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let adaptor = adaptor(fixed_hypervisors(), empty_prices());
        let first = adaptor.run().await.unwrap();
        let second = adaptor.run().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_prices_requested_for_all_tokens_in_one_batch() {
        let mut prices = MockPriceSource::new();
        prices
            .expect_fetch_prices()
            .withf(|coins| {
                coins.len() == 8
                    && coins.contains(&"ethereum:eth-2-t0".to_string())
                    && coins.contains(&"polygon:poly-1-t1".to_string())
            })
            .times(1)
            .returning(|coins| {
                Ok(coins
                    .iter()
                    .map(|c| {
                        let price = CoinPrice {
                            price: dec!(1),
                            symbol: None,
                            decimals: None,
                            timestamp: None,
                            confidence: None,
                        };
                        (c.clone(), price)
                    })
                    .collect())
            });

        let pools = adaptor(fixed_hypervisors(), prices).run().await.unwrap();
        assert_eq!(pools.len(), 3);
    }

    #[tokio::test]
    async fn test_prices_do_not_affect_yields() {
        let mut prices = MockPriceSource::new();
        prices.expect_fetch_prices().returning(|coins| {
            Ok(coins
                .iter()
                .map(|c| {
                    let price = CoinPrice {
                        price: dec!(12345.6),
                        symbol: None,
                        decimals: None,
                        timestamp: None,
                        confidence: None,
                    };
                    (c.clone(), price)
                })
                .collect())
        });

        let priced = adaptor(fixed_hypervisors(), prices).run().await.unwrap();
        let unpriced = adaptor(fixed_hypervisors(), empty_prices())
            .run()
            .await
            .unwrap();
        assert_eq!(priced, unpriced);
    }

    #[tokio::test]
    async fn test_chain_failure_fails_everything() {
        let mut source = MockHypervisorSource::new();
        source.expect_fetch_hypervisors().returning(|chain| {
            if chain.name == "arbitrum" {
                anyhow::bail!("connection refused")
            }
            Ok(vaults_for(chain.name))
        });

        let mut prices = MockPriceSource::new();
        prices.expect_fetch_prices().never();

        let err = adaptor(source, prices).run().await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_skip_failed_chains_keeps_the_rest() {
        let mut source = MockHypervisorSource::new();
        source.expect_fetch_hypervisors().returning(|chain| {
            if chain.name == "ethereum" {
                anyhow::bail!("timeout")
            }
            Ok(vaults_for(chain.name))
        });

        let pools = adaptor(source, empty_prices())
            .skip_failed_chains(true)
            .run()
            .await
            .unwrap();

        let ids: Vec<_> = pools.iter().map(|p| p.pool.as_str()).collect();
        assert_eq!(ids, vec!["poly-1"]);
    }

    #[tokio::test]
    async fn test_skip_failed_chains_errors_when_all_fail() {
        let mut source = MockHypervisorSource::new();
        source
            .expect_fetch_hypervisors()
            .returning(|_| anyhow::bail!("down"));

        let err = adaptor(source, empty_prices())
            .skip_failed_chains(true)
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("All 5 chain fetches failed"));
    }

    #[tokio::test]
    async fn test_price_failure_fails_everything() {
        let mut prices = MockPriceSource::new();
        prices
            .expect_fetch_prices()
            .returning(|_| anyhow::bail!("prices down"));

        let err = adaptor(fixed_hypervisors(), prices).run().await.unwrap_err();
        assert!(err.to_string().contains("prices down"));
    }

    #[tokio::test]
    async fn test_output_is_always_finite() {
        let mut source = MockHypervisorSource::new();
        source.expect_fetch_hypervisors().returning(|chain| {
            if chain.name != "celo" {
                return Ok(Vec::new());
            }
            Ok(vec![
                // zero-length window
                hypervisor(
                    "same-ts",
                    500,
                    vec![
                        rebalance(10, dec!(100), dec!(5)),
                        rebalance(10, dec!(100), dec!(5)),
                    ],
                ),
                // zero volume
                hypervisor(
                    "empty",
                    500,
                    vec![
                        rebalance(20, Decimal::ZERO, Decimal::ZERO),
                        rebalance(10, Decimal::ZERO, Decimal::ZERO),
                    ],
                ),
            ])
        });

        let pools = adaptor(source, empty_prices()).run().await.unwrap();
        assert_eq!(pools.len(), 2);
        assert!(pools.iter().all(|p| p.apy_base == Decimal::ZERO));
        assert_eq!(pools[0].tvl_usd, dec!(95));
        assert_eq!(pools[1].tvl_usd, Decimal::ZERO);

        let json = serde_json::to_value(&pools).unwrap();
        assert!(json[0]["apyBase"].as_f64().unwrap().is_finite());
    }

    #[test]
    fn test_descriptor() {
        let adaptor = adaptor(MockHypervisorSource::new(), MockPriceSource::new());
        let descriptor = adaptor.descriptor();
        assert!(!descriptor.timetravel);
        assert_eq!(descriptor.url, "https://app.gamma.xyz/dashboard");
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let vault = serde_json::json!({
            "id": "0xvault",
            "symbol": "xWETH-USDT",
            "created": "1600000000",
            "pool": {
                "token0": {"symbol": "WETH", "id": "0xweth", "decimals": "18"},
                "token1": {"symbol": "USDT", "id": "0xusdt", "decimals": "6"},
                "fee": "500"
            },
            "rebalances": [
                {"timestamp": "2000000", "totalAmountUSD": "100", "grossFeesUSD": "5"},
                {"timestamp": "1000000", "totalAmountUSD": "100", "grossFeesUSD": "5"}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/subgraphs/name/gammastrategies/gamma"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"uniswapV3Hypervisors": [vault]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/subgraphs/name/gammastrategies/celo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"uniswapV3Hypervisors": []}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/prices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coins": {"ethereum:0xweth": {"price": 3000.0}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.subgraph = SubgraphConfig {
            base_url: server.uri(),
            org: "gammastrategies".to_string(),
        };
        config.prices.url = format!("{}/prices", server.uri());

        let registry = ChainRegistry::builtin()
            .select(&["ethereum", "celo"])
            .unwrap();
        let adaptor = GammaAdaptor::new(&config, registry).unwrap();

        let pools = adaptor.apy().await.unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].symbol, "WETH-USDT");
        assert_eq!(pools[0].pool_meta, "0.5 univ3 pool");
        assert_eq!(pools[0].underlying_tokens, vec!["0xweth", "0xusdt"]);
    }
}

//! Enrichment aggregation for persona briefings
//!
//! Each persona carries a fixed set of external data providers (news
//! feeds, market series). Before the persona speaks, every provider is
//! queried concurrently and the merged results are rendered into a
//! textual briefing. One provider failing or timing out never removes
//! another provider's records.

use crate::models::EnrichmentRecord;
use crate::Result;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

pub mod analytics;
pub mod providers;

/// Rendered for any category that yields zero records, so prompt
/// construction always receives a well-formed section.
pub const NO_DATA_PLACEHOLDER: &str = "（目前沒有最新消息）";

/// Upper bound on a single provider call. On expiry the provider
/// contributes an empty result instead of hanging the persona's turn.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for a single external data source
#[async_trait::async_trait]
pub trait EnrichmentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Briefing section this provider's records fall under by default.
    fn category(&self) -> &'static str;

    /// Fetch records. An empty vec is a valid, non-error result.
    async fn query(&self) -> Result<Vec<EnrichmentRecord>>;
}

/// Fans out to a persona's providers and renders the briefing text.
pub struct EnrichmentAggregator;

impl EnrichmentAggregator {
    /// Query all providers concurrently, wait for every one to settle,
    /// and render one section per category.
    pub async fn briefing(providers: &[Arc<dyn EnrichmentProvider>]) -> String {
        if providers.is_empty() {
            return NO_DATA_PLACEHOLDER.to_string();
        }

        let settled = Self::settle_all(providers).await;

        // Category order follows provider order, first appearance wins.
        let mut order: Vec<String> = Vec::new();
        let mut by_category: HashMap<String, Vec<EnrichmentRecord>> = HashMap::new();

        for (provider, records) in providers.iter().zip(settled) {
            let default_category = provider.category().to_string();
            if !order.contains(&default_category) {
                order.push(default_category.clone());
            }

            for record in records {
                let category = record
                    .category
                    .clone()
                    .unwrap_or_else(|| default_category.clone());
                if !order.contains(&category) {
                    order.push(category.clone());
                }
                by_category.entry(category).or_default().push(record);
            }
        }

        let mut out = String::new();
        for category in &order {
            out.push_str(&format!("### {}\n", category));
            match by_category.get(category) {
                Some(records) if !records.is_empty() => {
                    for record in records {
                        out.push_str(&format!(
                            "[{}] {} ({})\n",
                            record.source, record.title, record.url
                        ));
                    }
                }
                _ => {
                    out.push_str(NO_DATA_PLACEHOLDER);
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        out.trim_end().to_string()
    }

    /// Run every provider to completion, success or failure. Each call
    /// is guarded individually, so a failed or expired provider yields
    /// an empty result and cannot cancel its siblings.
    async fn settle_all(providers: &[Arc<dyn EnrichmentProvider>]) -> Vec<Vec<EnrichmentRecord>> {
        let calls = providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move {
                match timeout(PROVIDER_TIMEOUT, provider.query()).await {
                    Ok(Ok(records)) => {
                        debug!(
                            provider = provider.name(),
                            count = records.len(),
                            "Enrichment provider settled"
                        );
                        records
                    }
                    Ok(Err(e)) => {
                        warn!(provider = provider.name(), error = %e, "Enrichment provider failed");
                        Vec::new()
                    }
                    Err(_) => {
                        warn!(provider = provider.name(), "Enrichment provider timed out");
                        Vec::new()
                    }
                }
            }
        });

        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;

    struct StaticProvider {
        name: &'static str,
        category: &'static str,
        records: Vec<EnrichmentRecord>,
    }

    #[async_trait::async_trait]
    impl EnrichmentProvider for StaticProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn category(&self) -> &'static str {
            self.category
        }

        async fn query(&self) -> Result<Vec<EnrichmentRecord>> {
            Ok(self.records.clone())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl EnrichmentProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn category(&self) -> &'static str {
            "crypto-news"
        }

        async fn query(&self) -> Result<Vec<EnrichmentRecord>> {
            Err(OrchestratorError::EnrichmentError(
                "connection refused".to_string(),
            ))
        }
    }

    struct HangingProvider;

    #[async_trait::async_trait]
    impl EnrichmentProvider for HangingProvider {
        fn name(&self) -> &'static str {
            "hanging"
        }

        fn category(&self) -> &'static str {
            "market"
        }

        async fn query(&self) -> Result<Vec<EnrichmentRecord>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }
    }

    fn headline(title: &str, source: &str) -> EnrichmentRecord {
        EnrichmentRecord {
            title: title.to_string(),
            source: source.to_string(),
            url: format!("https://example.com/{}", title),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_one_failure_keeps_sibling_records() {
        let providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(FailingProvider),
            Arc::new(StaticProvider {
                name: "coindesk",
                category: "crypto-news",
                records: vec![headline("BTC breaks 100k", "CoinDesk")],
            }),
        ];

        let briefing = EnrichmentAggregator::briefing(&providers).await;
        assert!(briefing.contains("[CoinDesk] BTC breaks 100k"));
        assert!(!briefing.contains(NO_DATA_PLACEHOLDER));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(HangingProvider),
            Arc::new(StaticProvider {
                name: "coindesk",
                category: "crypto-news",
                records: vec![headline("ETH merge anniversary", "CoinDesk")],
            }),
        ];

        let briefing = EnrichmentAggregator::briefing(&providers).await;
        assert!(briefing.contains("[CoinDesk] ETH merge anniversary"));
        // The market section rendered its placeholder instead of hanging.
        assert!(briefing.contains("### market"));
        assert!(briefing.contains(NO_DATA_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_all_providers_empty_renders_placeholders() {
        let providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(StaticProvider {
                name: "coindesk",
                category: "crypto-news",
                records: vec![],
            }),
            Arc::new(StaticProvider {
                name: "coingecko",
                category: "market",
                records: vec![],
            }),
        ];

        let briefing = EnrichmentAggregator::briefing(&providers).await;
        assert!(briefing.contains("### crypto-news"));
        assert!(briefing.contains("### market"));
        assert_eq!(briefing.matches(NO_DATA_PLACEHOLDER).count(), 2);
    }

    #[tokio::test]
    async fn test_category_merge_across_providers() {
        let providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(StaticProvider {
                name: "coindesk",
                category: "crypto-news",
                records: vec![headline("BTC breaks 100k", "CoinDesk")],
            }),
            Arc::new(StaticProvider {
                name: "cointelegraph",
                category: "crypto-news",
                records: vec![headline("Whales accumulate", "CoinTelegraph")],
            }),
        ];

        let briefing = EnrichmentAggregator::briefing(&providers).await;
        assert_eq!(briefing.matches("### crypto-news").count(), 1);
        assert!(briefing.contains("[CoinDesk] BTC breaks 100k"));
        assert!(briefing.contains("[CoinTelegraph] Whales accumulate"));
    }

    #[tokio::test]
    async fn test_no_providers() {
        let briefing = EnrichmentAggregator::briefing(&[]).await;
        assert_eq!(briefing, NO_DATA_PLACEHOLDER);
    }
}

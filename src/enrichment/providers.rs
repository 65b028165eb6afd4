//! HTTP-backed enrichment providers
//!
//! News headlines come from crypto news front pages; market series come
//! from the CoinGecko public API. Providers apply their own request
//! timeout so a dead upstream degrades to an empty briefing section.

use crate::enrichment::{analytics, EnrichmentProvider};
use crate::error::OrchestratorError;
use crate::models::EnrichmentRecord;
use crate::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Recent samples considered for support/resistance derivation.
const MARKET_WINDOW_DAYS: usize = 30;

fn build_client() -> Client {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .timeout(HTTP_TIMEOUT)
        .user_agent("family-chat-orchestrator/0.1")
        .build()
        .expect("Failed to build HTTP client")
}

//
// ================= News headlines =================
//

/// Scrapes `article h3` title/link pairs from a news front page.
/// CoinDesk and CoinTelegraph share this page shape.
pub struct HeadlineProvider {
    client: Client,
    name: &'static str,
    source: &'static str,
    base_url: String,
}

impl HeadlineProvider {
    pub fn coindesk() -> Self {
        Self::new("coindesk", "CoinDesk", "https://www.coindesk.com")
    }

    pub fn cointelegraph() -> Self {
        Self::new("cointelegraph", "CoinTelegraph", "https://cointelegraph.com")
    }

    fn new(name: &'static str, source: &'static str, base_url: &str) -> Self {
        Self {
            client: build_client(),
            name,
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn extract(&self, html: &str) -> Vec<EnrichmentRecord> {
        let document = Html::parse_document(html);
        let article = Selector::parse("article").expect("valid selector");
        let heading = Selector::parse("h3").expect("valid selector");
        let link = Selector::parse("a").expect("valid selector");

        let mut records = Vec::new();
        for element in document.select(&article) {
            let title = element
                .select(&heading)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string());
            let href = element
                .select(&link)
                .find_map(|a| a.value().attr("href"));

            if let (Some(title), Some(href)) = (title, href) {
                if title.is_empty() {
                    continue;
                }
                let url = if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{}{}", self.base_url, href)
                };
                records.push(EnrichmentRecord {
                    title,
                    source: self.source.to_string(),
                    url,
                    category: None,
                });
            }
        }
        records
    }
}

#[async_trait::async_trait]
impl EnrichmentProvider for HeadlineProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> &'static str {
        "crypto-news"
    }

    async fn query(&self) -> Result<Vec<EnrichmentRecord>> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrchestratorError::EnrichmentError(format!(
                "{} returned {}",
                self.source, status
            )));
        }

        let html = response.text().await?;
        Ok(self.extract(&html))
    }
}

//
// ================= Market series =================
//

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[timestamp_ms, price]` pairs, oldest first.
    prices: Vec<[f64; 2]>,
}

/// Fetches a 30-day daily USD price series and renders support and
/// resistance levels for the briefing.
pub struct MarketChartProvider {
    client: Client,
    name: &'static str,
    symbol: &'static str,
    coin_id: &'static str,
    base_url: String,
}

impl MarketChartProvider {
    pub fn bitcoin() -> Self {
        Self::new("coingecko-btc", "BTC", "bitcoin")
    }

    pub fn ethereum() -> Self {
        Self::new("coingecko-eth", "ETH", "ethereum")
    }

    fn new(name: &'static str, symbol: &'static str, coin_id: &'static str) -> Self {
        Self {
            client: build_client(),
            name,
            symbol,
            coin_id,
            base_url: "https://api.coingecko.com".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EnrichmentProvider for MarketChartProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> &'static str {
        "market"
    }

    async fn query(&self) -> Result<Vec<EnrichmentRecord>> {
        let url = format!(
            "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
            self.base_url, self.coin_id, MARKET_WINDOW_DAYS
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrchestratorError::EnrichmentError(format!(
                "CoinGecko returned {} for {}",
                status, self.coin_id
            )));
        }

        let chart: MarketChart = response.json().await?;

        Ok(summarize_chart(self.symbol, &chart.prices)
            .map(|title| {
                vec![EnrichmentRecord {
                    title,
                    source: "CoinGecko".to_string(),
                    url,
                    category: None,
                }]
            })
            .unwrap_or_default())
    }
}

/// Render one briefing line for a price series: latest close with date,
/// percent change over the window, and derived support/resistance
/// levels. None for an empty series.
fn summarize_chart(symbol: &str, points: &[[f64; 2]]) -> Option<String> {
    let first = points.first()?;
    let last = points.last()?;

    let prices: Vec<f64> = points.iter().map(|p| p[1]).collect();
    let support = analytics::support_levels(&prices, MARKET_WINDOW_DAYS)?;
    let resistance = analytics::resistance_levels(&prices, MARKET_WINDOW_DAYS)?;

    let change_pct = if first[1] != 0.0 {
        (last[1] - first[1]) / first[1] * 100.0
    } else {
        0.0
    };

    Some(format!(
        "{} last {} on {} ({} since {}); support {} / {}; resistance {} / {}",
        symbol,
        analytics::format_money(last[1]),
        analytics::format_date(last[0]),
        analytics::format_percent(change_pct),
        analytics::format_date(first[0]),
        analytics::format_money(support[0]),
        analytics::format_money(support[1]),
        analytics::format_money(resistance[0]),
        analytics::format_money(resistance[1]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_headlines() {
        let provider = HeadlineProvider::coindesk();
        let html = r#"
            <html><body>
            <article>
                <h3> BTC breaks 100k </h3>
                <a href="/markets/btc-100k">read</a>
            </article>
            <article>
                <h3>ETH upgrade ships</h3>
                <a href="https://other.example.com/eth">read</a>
            </article>
            <article>
                <h3></h3>
                <a href="/empty-title">read</a>
            </article>
            <article>
                <h3>No link here</h3>
            </article>
            </body></html>
        "#;

        let records = provider.extract(html);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "BTC breaks 100k");
        assert_eq!(records[0].source, "CoinDesk");
        assert_eq!(records[0].url, "https://www.coindesk.com/markets/btc-100k");

        assert_eq!(records[1].url, "https://other.example.com/eth");
    }

    #[test]
    fn test_summarize_chart() {
        // 2021-01-01 through 2021-01-05, one sample per day.
        let day = 86_400_000.0;
        let t0 = 1_609_459_200_000.0;
        let points: Vec<[f64; 2]> = [100.0, 90.0, 80.0, 110.0, 95.0]
            .iter()
            .enumerate()
            .map(|(i, price)| [t0 + i as f64 * day, *price])
            .collect();

        let line = summarize_chart("BTC", &points).unwrap();
        assert!(line.contains("BTC last $95.00 on 2021-01-05"));
        assert!(line.contains("-5.00% since 2021-01-01"));
        assert!(line.contains("support $78.40 / $76.00"));
        assert!(line.contains("resistance $112.20 / $115.50"));
    }

    #[test]
    fn test_summarize_chart_empty_series() {
        assert!(summarize_chart("BTC", &[]).is_none());
    }
}

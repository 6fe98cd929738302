use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Error, MarketDataSource, Result, TickerStats};

/// REST client for the public Binance USDⓈ-M futures market-data API.
///
/// Only unauthenticated endpoints are used — no API key, no signing.
/// The base URL is injectable so tests can point it at a local stub.
pub struct BinanceFutures {
    base_url: String,
    http: Client,
}

impl BinanceFutures {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &str) -> Result<T> {
        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };
        debug!(%url, "Fetching market data");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Market(format!("HTTP {status}: {body}")));
        }
        serde_json::from_str(&body).map_err(|e| Error::Market(e.to_string()))
    }
}

#[async_trait]
impl MarketDataSource for BinanceFutures {
    async fn tradable_symbols(&self) -> Result<Vec<String>> {
        let info: ExchangeInfo = self.get_json("/fapi/v1/exchangeInfo", "").await?;
        Ok(info
            .symbols
            .into_iter()
            .filter(|s| {
                s.contract_type == "PERPETUAL" && s.quote_asset == "USDT" && s.status == "TRADING"
            })
            .map(|s| s.symbol)
            .collect())
    }

    async fn ticker_snapshot(&self) -> Result<Vec<TickerStats>> {
        let tickers: Vec<Ticker24h> = self.get_json("/fapi/v1/ticker/24hr", "").await?;
        // Rows with unparseable decimals are dropped rather than poisoning
        // the whole snapshot.
        Ok(tickers.into_iter().filter_map(Ticker24h::into_stats).collect())
    }

    async fn funding_rates(&self) -> Result<HashMap<String, f64>> {
        let rows: Vec<PremiumIndex> = self.get_json("/fapi/v1/premiumIndex", "").await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let rate = r.last_funding_rate.parse::<f64>().ok()?;
                Some((r.symbol, rate))
            })
            .collect())
    }

    async fn open_interest(&self, symbol: &str) -> Result<f64> {
        let oi: OpenInterestRow = self
            .get_json("/fapi/v1/openInterest", &format!("symbol={symbol}"))
            .await?;
        oi.open_interest
            .parse::<f64>()
            .map_err(|_| Error::Market(format!("Bad open interest for {symbol}: '{}'", oi.open_interest)))
    }
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol: String,
    contract_type: String,
    quote_asset: String,
    status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    symbol: String,
    last_price: String,
    price_change_percent: String,
    quote_volume: String,
    high_price: String,
    low_price: String,
}

impl Ticker24h {
    fn into_stats(self) -> Option<TickerStats> {
        Some(TickerStats {
            symbol: self.symbol,
            last_price: self.last_price.parse().ok()?,
            change_pct_24h: self.price_change_percent.parse().ok()?,
            quote_volume: self.quote_volume.parse().ok()?,
            high_24h: self.high_price.parse().ok()?,
            low_24h: self.low_price.parse().ok()?,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    symbol: String,
    last_funding_rate: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterestRow {
    open_interest: String,
}

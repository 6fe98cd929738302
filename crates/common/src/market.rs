use std::collections::HashMap;

use async_trait::async_trait;

use crate::{Result, TickerStats};

/// Abstraction over the read-only market-data collaborator.
///
/// `BinanceFutures` in `crates/engine` implements this against the public
/// USDⓈ-M futures REST API. The market feed polls the bulk endpoints on a
/// fixed interval; `open_interest` is intentionally a separate on-demand
/// single-symbol call and is never part of the periodic snapshot.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Symbols eligible for the dashboard: perpetual contracts, USDT-quoted,
    /// currently trading.
    async fn tradable_symbols(&self) -> Result<Vec<String>>;

    /// 24h ticker statistics for every symbol the exchange reports.
    async fn ticker_snapshot(&self) -> Result<Vec<TickerStats>>;

    /// Current funding rate per symbol. A symbol absent from the map is
    /// treated as funding 0 downstream, never as an error.
    async fn funding_rates(&self) -> Result<HashMap<String, f64>>;

    /// Current open interest for one symbol.
    async fn open_interest(&self, symbol: &str) -> Result<f64>;
}

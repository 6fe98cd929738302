use std::collections::HashMap;

use common::{MarketRecord, TickerStats};

use crate::categories::categorize;

/// Momentum score: a relative ranking signal, unbounded and not normalized
/// across symbols. Weights: 40% |24h change|, 30% volume in millions,
/// 30% |funding| scaled by 1000.
pub fn momentum_score(change_24h: f64, volume: f64, funding_rate: f64) -> f64 {
    let change_score = change_24h.abs() * 0.4;
    let volume_score = volume / 1_000_000.0 * 0.3;
    let funding_score = funding_rate.abs() * 1000.0 * 0.3;
    change_score + volume_score + funding_score
}

/// Merge the raw ticker feed and the funding-rate lookup into one
/// `MarketRecord` per symbol.
///
/// Symbols without a ticker are skipped (the exchange occasionally lists a
/// contract before its ticker shows up); symbols without a funding entry
/// get funding 0. Output order follows the input symbol list.
pub fn normalize(
    symbols: &[String],
    tickers: &[TickerStats],
    funding: &HashMap<String, f64>,
) -> Vec<MarketRecord> {
    let ticker_by_symbol: HashMap<&str, &TickerStats> =
        tickers.iter().map(|t| (t.symbol.as_str(), t)).collect();

    symbols
        .iter()
        .filter_map(|symbol| {
            let ticker = ticker_by_symbol.get(symbol.as_str())?;
            let funding_rate = funding.get(symbol).copied().unwrap_or(0.0);
            Some(MarketRecord {
                symbol: symbol.clone(),
                price: ticker.last_price,
                change_24h: ticker.change_pct_24h,
                volume: ticker.quote_volume,
                high_24h: ticker.high_24h,
                low_24h: ticker.low_24h,
                funding_rate,
                category: categorize(symbol),
                momentum: momentum_score(ticker.change_pct_24h, ticker.quote_volume, funding_rate),
            })
        })
        .collect()
}

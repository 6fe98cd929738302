mod breakout;
mod funding;
mod reversion;
mod scalp;
mod trend;

pub use breakout::Breakout;
pub use funding::FundingArbitrage;
pub use reversion::MeanReversion;
pub use scalp::MomentumScalp;
pub use trend::TrendFollowing;

use common::{MarketRecord, TradeDirection, TradeSignal};

/// Pick the candidate with the largest `key`.
///
/// Equal keys resolve to the lexicographically smallest symbol, so the
/// selection is deterministic regardless of snapshot order.
pub(crate) fn best_by<'a, I, F>(candidates: I, key: F) -> Option<&'a MarketRecord>
where
    I: IntoIterator<Item = &'a MarketRecord>,
    F: Fn(&MarketRecord) -> f64,
{
    candidates.into_iter().max_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then_with(|| b.symbol.cmp(&a.symbol))
    })
}

pub(crate) fn signal(record: &MarketRecord, direction: TradeDirection) -> TradeSignal {
    TradeSignal {
        symbol: record.symbol.clone(),
        direction,
        entry_price: record.price,
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use common::{Category, MarketRecord};

    /// Snapshot fixture: a record with sane 24h levels around `price`.
    pub fn record(symbol: &str, price: f64, change_24h: f64, volume: f64, funding: f64) -> MarketRecord {
        MarketRecord {
            symbol: symbol.to_string(),
            price,
            change_24h,
            volume,
            high_24h: price * 1.08,
            low_24h: price * 0.92,
            funding_rate: funding,
            category: Category::Infrastructure,
            momentum: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::record;
    use super::*;

    #[test]
    fn best_by_prefers_larger_key() {
        let snapshot = vec![
            record("AUSDT", 1.0, 2.0, 0.0, 0.0),
            record("BUSDT", 1.0, 9.0, 0.0, 0.0),
        ];
        let best = best_by(snapshot.iter(), |m| m.change_24h.abs()).unwrap();
        assert_eq!(best.symbol, "BUSDT");
    }

    #[test]
    fn best_by_ties_resolve_to_smallest_symbol() {
        let snapshot = vec![
            record("ZENUSDT", 1.0, 5.0, 0.0, 0.0),
            record("ABCUSDT", 1.0, 5.0, 0.0, 0.0),
            record("MIDUSDT", 1.0, 5.0, 0.0, 0.0),
        ];
        let best = best_by(snapshot.iter(), |m| m.change_24h.abs()).unwrap();
        assert_eq!(best.symbol, "ABCUSDT");
    }

    #[test]
    fn best_by_empty_is_none() {
        let empty: Vec<common::MarketRecord> = Vec::new();
        assert!(best_by(empty.iter(), |m| m.change_24h).is_none());
    }
}

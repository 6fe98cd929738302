use serde::Deserialize;

use common::{MarketRecord, TradeDirection, TradeSignal};

use super::{best_by, signal};
use crate::Strategy;

/// Counter-trades extreme 24h moves: shorts a spike, longs a dump.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeanReversion {
    /// |24h change| in percent above which a move counts as extreme.
    pub min_abs_change_pct: f64,
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self {
            min_abs_change_pct: 8.0,
        }
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &'static str {
        "Mean Reversion"
    }

    fn description(&self) -> &'static str {
        "Counter-trades extreme moves with high OI"
    }

    fn evaluate(&self, snapshot: &[MarketRecord]) -> Option<TradeSignal> {
        let candidates = snapshot
            .iter()
            .filter(|m| m.change_24h.abs() > self.min_abs_change_pct);
        let best = best_by(candidates, |m| m.change_24h.abs())?;
        // Counter-trend: fade the move.
        let direction = if best.change_24h > 0.0 {
            TradeDirection::Short
        } else {
            TradeDirection::Long
        };
        Some(signal(best, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::record;
    use super::*;

    #[test]
    fn no_signal_on_empty_snapshot() {
        assert!(MeanReversion::default().evaluate(&[]).is_none());
    }

    #[test]
    fn moderate_moves_are_ignored() {
        let snapshot = vec![record("AUSDT", 10.0, 7.9, 1e6, 0.0)];
        assert!(MeanReversion::default().evaluate(&snapshot).is_none());
    }

    #[test]
    fn fades_the_most_extreme_spike() {
        let snapshot = vec![
            record("AUSDT", 10.0, 9.0, 1e6, 0.0),
            record("BUSDT", 20.0, 12.0, 1e6, 0.0),
        ];
        let sig = MeanReversion::default().evaluate(&snapshot).unwrap();
        assert_eq!(sig.symbol, "BUSDT");
        assert_eq!(sig.direction, TradeDirection::Short);
    }

    #[test]
    fn fades_a_dump_by_going_long() {
        let snapshot = vec![record("AUSDT", 10.0, -11.0, 1e6, 0.0)];
        let sig = MeanReversion::default().evaluate(&snapshot).unwrap();
        assert_eq!(sig.direction, TradeDirection::Long);
        assert_eq!(sig.entry_price, 10.0);
    }
}

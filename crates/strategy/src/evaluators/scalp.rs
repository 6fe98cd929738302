use serde::Deserialize;

use common::{MarketRecord, TradeDirection, TradeSignal};

use super::{best_by, signal};
use crate::Strategy;

/// Takes the single strongest mover of the snapshot, in the direction of
/// the move, as long as it clears the minimum change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MomentumScalp {
    /// |24h change| in percent the top mover must reach.
    pub min_abs_change_pct: f64,
}

impl Default for MomentumScalp {
    fn default() -> Self {
        Self {
            min_abs_change_pct: 3.0,
        }
    }
}

impl Strategy for MomentumScalp {
    fn name(&self) -> &'static str {
        "Momentum Scalp"
    }

    fn description(&self) -> &'static str {
        "Selects top asset by absolute change"
    }

    fn evaluate(&self, snapshot: &[MarketRecord]) -> Option<TradeSignal> {
        let top = best_by(snapshot.iter(), |m| m.change_24h.abs())?;
        if top.change_24h.abs() < self.min_abs_change_pct {
            return None;
        }
        let direction = if top.change_24h > 0.0 {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        };
        Some(signal(top, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::record;
    use super::*;

    #[test]
    fn no_signal_on_empty_snapshot() {
        assert!(MomentumScalp::default().evaluate(&[]).is_none());
    }

    #[test]
    fn quiet_market_produces_no_signal() {
        let snapshot = vec![
            record("AUSDT", 10.0, 2.0, 1e6, 0.0),
            record("BUSDT", 20.0, -1.0, 1e6, 0.0),
        ];
        assert!(MomentumScalp::default().evaluate(&snapshot).is_none());
    }

    #[test]
    fn top_mover_sets_symbol_and_direction() {
        let snapshot = vec![
            record("AUSDT", 10.0, 4.0, 1e6, 0.0),
            record("BUSDT", 20.0, -3.5, 1e6, 0.0),
        ];
        let sig = MomentumScalp::default().evaluate(&snapshot).unwrap();
        assert_eq!(sig.symbol, "AUSDT");
        assert_eq!(sig.direction, TradeDirection::Long);

        let snapshot = vec![
            record("AUSDT", 10.0, 3.5, 1e6, 0.0),
            record("BUSDT", 20.0, -4.0, 1e6, 0.0),
        ];
        let sig = MomentumScalp::default().evaluate(&snapshot).unwrap();
        assert_eq!(sig.symbol, "BUSDT");
        assert_eq!(sig.direction, TradeDirection::Short);
    }

    #[test]
    fn threshold_is_inclusive() {
        // Exactly at the minimum still signals (only below is rejected).
        let snapshot = vec![record("AUSDT", 10.0, 3.0, 1e6, 0.0)];
        assert!(MomentumScalp::default().evaluate(&snapshot).is_some());
    }
}

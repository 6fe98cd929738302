use serde::Deserialize;

use common::{MarketRecord, TradeDirection, TradeSignal};

use super::{best_by, signal};
use crate::Strategy;

/// Rides sustained 24h moves confirmed by funding pressure: longs need a
/// positive move with positive funding, shorts the mirror image.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendFollowing {
    /// Minimum |24h change| in percent to qualify.
    pub min_change_pct: f64,
    /// Minimum |funding rate| confirming the move.
    pub min_funding: f64,
}

impl Default for TrendFollowing {
    fn default() -> Self {
        Self {
            min_change_pct: 5.0,
            min_funding: 0.0001,
        }
    }
}

impl Strategy for TrendFollowing {
    fn name(&self) -> &'static str {
        "Trend Following"
    }

    fn description(&self) -> &'static str {
        "Enters LONG/SHORT based on 24h change + funding rate"
    }

    fn evaluate(&self, snapshot: &[MarketRecord]) -> Option<TradeSignal> {
        let candidates = snapshot.iter().filter(|m| {
            (m.change_24h > self.min_change_pct && m.funding_rate > self.min_funding)
                || (m.change_24h < -self.min_change_pct && m.funding_rate < -self.min_funding)
        });
        let best = best_by(candidates, |m| m.change_24h.abs())?;
        let direction = if best.change_24h > 0.0 {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        };
        Some(signal(best, direction))
    }
}

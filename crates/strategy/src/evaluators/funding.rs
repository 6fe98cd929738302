use serde::Deserialize;

use common::{MarketRecord, TradeDirection, TradeSignal};

use super::{best_by, signal};
use crate::Strategy;

/// Trades anomalous funding: shorts crowded longs (high positive funding),
/// longs crowded shorts (negative funding).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FundingArbitrage {
    /// Funding above this is an anomaly on the long side.
    pub positive_threshold: f64,
    /// Funding below this is an anomaly on the short side.
    pub negative_threshold: f64,
}

impl Default for FundingArbitrage {
    fn default() -> Self {
        Self {
            positive_threshold: 0.001,
            negative_threshold: -0.0005,
        }
    }
}

impl Strategy for FundingArbitrage {
    fn name(&self) -> &'static str {
        "Funding Rate Arbitrage"
    }

    fn description(&self) -> &'static str {
        "Trades based on anomalous funding rates"
    }

    fn evaluate(&self, snapshot: &[MarketRecord]) -> Option<TradeSignal> {
        let candidates = snapshot.iter().filter(|m| {
            m.funding_rate > self.positive_threshold || m.funding_rate < self.negative_threshold
        });
        let best = best_by(candidates, |m| m.funding_rate.abs())?;
        let direction = if best.funding_rate > 0.0 {
            TradeDirection::Short
        } else {
            TradeDirection::Long
        };
        Some(signal(best, direction))
    }
}

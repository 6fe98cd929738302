use serde::Deserialize;

use common::{MarketRecord, TradeDirection, TradeSignal};

use super::signal;
use crate::Strategy;

/// Enters when price presses the 24h extreme on outsized volume: within 1%
/// of the high goes LONG, within 1% of the low goes SHORT.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Breakout {
    /// Fraction of the 24h high that counts as "near the high" (0.99 = 1%).
    pub high_proximity: f64,
    /// Fraction of the 24h low that counts as "near the low" (1.01 = 1%).
    pub low_proximity: f64,
    /// Required multiple of the snapshot's average volume.
    pub volume_multiple: f64,
}

impl Default for Breakout {
    fn default() -> Self {
        Self {
            high_proximity: 0.99,
            low_proximity: 1.01,
            volume_multiple: 1.5,
        }
    }
}

impl Breakout {
    fn near_high(&self, m: &MarketRecord) -> bool {
        m.price >= m.high_24h * self.high_proximity
    }

    fn near_low(&self, m: &MarketRecord) -> bool {
        m.price <= m.low_24h * self.low_proximity
    }
}

impl Strategy for Breakout {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn description(&self) -> &'static str {
        "Enters when price near 24h high/low with high volume"
    }

    fn evaluate(&self, snapshot: &[MarketRecord]) -> Option<TradeSignal> {
        if snapshot.is_empty() {
            return None;
        }
        let avg_volume = snapshot.iter().map(|m| m.volume).sum::<f64>() / snapshot.len() as f64;

        // No ranking here: the first qualifying symbol in snapshot order wins.
        let best = snapshot.iter().find(|m| {
            (self.near_high(m) || self.near_low(m)) && m.volume > avg_volume * self.volume_multiple
        })?;

        let direction = if self.near_high(best) {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        };
        Some(signal(best, direction))
    }
}

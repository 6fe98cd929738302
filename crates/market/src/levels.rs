//! Derived price levels and display metrics.
//!
//! Everything here is a pure function of its inputs with fixed percentage
//! offsets. Directions are always explicit; nothing reads ambient state.

use serde::Serialize;

use common::{MarketBias, TradeDirection};

/// Suggested entry zone: ±2% around the current price.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntryZone {
    pub min: f64,
    pub max: f64,
}

/// Three-step take-profit ladder relative to the entry price.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TakeProfits {
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
}

pub fn entry_zone(price: f64) -> EntryZone {
    EntryZone {
        min: price * 0.98,
        max: price * 1.02,
    }
}

/// Take-profit ladder: +3%/+6%/+10% for LONG, mirrored for SHORT.
pub fn take_profits(entry_price: f64, direction: TradeDirection) -> TakeProfits {
    match direction {
        TradeDirection::Long => TakeProfits {
            tp1: entry_price * 1.03,
            tp2: entry_price * 1.06,
            tp3: entry_price * 1.10,
        },
        TradeDirection::Short => TakeProfits {
            tp1: entry_price * 0.97,
            tp2: entry_price * 0.94,
            tp3: entry_price * 0.90,
        },
    }
}

/// Stop loss 2% against the entry.
pub fn stop_loss(entry_price: f64, direction: TradeDirection) -> f64 {
    match direction {
        TradeDirection::Long => entry_price * 0.98,
        TradeDirection::Short => entry_price * 1.02,
    }
}

/// Signed PnL in percent of the entry price.
pub fn pnl_percent(entry_price: f64, current_price: f64, direction: TradeDirection) -> f64 {
    match direction {
        TradeDirection::Long => (current_price - entry_price) / entry_price * 100.0,
        TradeDirection::Short => (entry_price - current_price) / entry_price * 100.0,
    }
}

/// Progress toward TP1 in percent, clamped to [0, 100].
///
/// Degenerate level geometry (entry == TP1, or any non-finite ratio)
/// resolves to 0 — consumers never see NaN or infinities.
pub fn progress_to_tp1(
    entry_price: f64,
    current_price: f64,
    tp1: f64,
    direction: TradeDirection,
) -> f64 {
    let (total, traveled) = match direction {
        TradeDirection::Long => (tp1 - entry_price, current_price - entry_price),
        TradeDirection::Short => (entry_price - tp1, entry_price - current_price),
    };
    if total == 0.0 {
        return 0.0;
    }
    let pct = traveled / total * 100.0;
    if !pct.is_finite() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Bullish above +5%, bearish below −5%, neutral in between.
pub fn market_bias(change_24h: f64) -> MarketBias {
    if change_24h > 5.0 {
        MarketBias::Bullish
    } else if change_24h < -5.0 {
        MarketBias::Bearish
    } else {
        MarketBias::Neutral
    }
}

/// Synthetic long/short ratio from the funding rate.
///
/// A display heuristic, not an order-book measurement: positive funding
/// shifts the ratio toward longs, clamped to [0.05, 0.95].
pub fn long_short_ratio(funding_rate: f64) -> f64 {
    (0.5 + funding_rate * 1000.0).clamp(0.05, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn entry_zone_is_two_percent_band() {
        let zone = entry_zone(100.0);
        assert!(close_to(zone.min, 98.0));
        assert!(close_to(zone.max, 102.0));
    }

    #[test]
    fn take_profit_ladder_long() {
        let tps = take_profits(100.0, TradeDirection::Long);
        assert!(close_to(tps.tp1, 103.0));
        assert!(close_to(tps.tp2, 106.0));
        assert!(close_to(tps.tp3, 110.0));
    }

    #[test]
    fn take_profit_ladder_short() {
        let tps = take_profits(100.0, TradeDirection::Short);
        assert!(close_to(tps.tp1, 97.0));
        assert!(close_to(tps.tp2, 94.0));
        assert!(close_to(tps.tp3, 90.0));
    }

    #[test]
    fn stop_loss_two_percent_against_entry() {
        assert!(close_to(stop_loss(100.0, TradeDirection::Long), 98.0));
        assert!(close_to(stop_loss(100.0, TradeDirection::Short), 102.0));
    }

    #[test]
    fn pnl_sign_follows_direction() {
        assert!(close_to(pnl_percent(100.0, 110.0, TradeDirection::Long), 10.0));
        assert!(close_to(pnl_percent(100.0, 90.0, TradeDirection::Short), 10.0));
        assert!(close_to(pnl_percent(100.0, 90.0, TradeDirection::Long), -10.0));
        assert!(close_to(pnl_percent(100.0, 110.0, TradeDirection::Short), -10.0));
    }

    #[test]
    fn progress_clamps_to_unit_range() {
        // Halfway to TP1 on a LONG from 100 to 103.
        let p = progress_to_tp1(100.0, 101.5, 103.0, TradeDirection::Long);
        assert!(close_to(p, 50.0));
        // Past TP1 clamps at 100, below entry clamps at 0.
        assert!(close_to(
            progress_to_tp1(100.0, 105.0, 103.0, TradeDirection::Long),
            100.0
        ));
        assert!(close_to(
            progress_to_tp1(100.0, 95.0, 103.0, TradeDirection::Long),
            0.0
        ));
    }

    #[test]
    fn progress_short_counts_downward_movement() {
        let p = progress_to_tp1(100.0, 98.5, 97.0, TradeDirection::Short);
        assert!(close_to(p, 50.0));
    }

    #[test]
    fn degenerate_progress_is_zero_not_nan() {
        // entry == TP1 would divide by zero.
        let p = progress_to_tp1(100.0, 100.0, 100.0, TradeDirection::Long);
        assert!(close_to(p, 0.0));
        assert!(progress_to_tp1(0.0, 0.0, 0.0, TradeDirection::Short).is_finite());
    }

    #[test]
    fn bias_thresholds() {
        assert_eq!(market_bias(6.0), MarketBias::Bullish);
        assert_eq!(market_bias(-6.0), MarketBias::Bearish);
        assert_eq!(market_bias(0.0), MarketBias::Neutral);
        // Exactly ±5 is still neutral.
        assert_eq!(market_bias(5.0), MarketBias::Neutral);
        assert_eq!(market_bias(-5.0), MarketBias::Neutral);
    }

    #[test]
    fn long_short_ratio_centers_and_clamps() {
        assert!(close_to(long_short_ratio(0.0), 0.5));
        assert!(close_to(long_short_ratio(0.0001), 0.6));
        assert!(close_to(long_short_ratio(0.01), 0.95));
        assert!(close_to(long_short_ratio(-0.01), 0.05));
    }
}

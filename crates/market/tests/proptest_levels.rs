use proptest::prelude::*;

use common::Category;
use market::levels;

proptest! {
    /// Categorization is total: any string maps to exactly one of the seven
    /// categories without panicking, including non-ASCII input.
    #[test]
    fn categorize_is_total(symbol in ".{0,24}") {
        let category = market::categorize(&symbol);
        prop_assert!(Category::ALL.contains(&category));
    }

    /// The synthetic long/short ratio stays inside its display bounds for
    /// any plausible funding rate.
    #[test]
    fn long_short_ratio_stays_bounded(funding in -10.0f64..10.0f64) {
        let ratio = levels::long_short_ratio(funding);
        prop_assert!((0.05..=0.95).contains(&ratio));
    }

    /// Progress toward TP1 is always a finite value in [0, 100], whatever
    /// the level geometry — including inverted or collapsed levels.
    #[test]
    fn progress_is_always_finite_and_clamped(
        entry in -1_000_000.0f64..1_000_000.0f64,
        current in -1_000_000.0f64..1_000_000.0f64,
        tp1 in -1_000_000.0f64..1_000_000.0f64,
    ) {
        for direction in [common::TradeDirection::Long, common::TradeDirection::Short] {
            let p = levels::progress_to_tp1(entry, current, tp1, direction);
            prop_assert!(p.is_finite());
            prop_assert!((0.0..=100.0).contains(&p));
        }
    }

    /// LONG and SHORT PnL are exact mirrors of each other.
    #[test]
    fn pnl_directions_mirror(
        entry in 0.0001f64..1_000_000.0f64,
        current in 0.0001f64..1_000_000.0f64,
    ) {
        let long = levels::pnl_percent(entry, current, common::TradeDirection::Long);
        let short = levels::pnl_percent(entry, current, common::TradeDirection::Short);
        prop_assert!((long + short).abs() < 1e-6);
    }
}

use std::collections::HashSet;

use tracing::info;

use common::{ActiveTrade, MarketRecord, ModuleStatus, StrategyModuleView, TradeSignal};

use crate::config::ModulesConfig;
use crate::Strategy;

/// Owns the five fixed strategy modules and dispatches snapshots to them.
///
/// The set of modules is static; construction only applies tuning
/// parameters. Evaluation order is the registration order below, which is
/// also the dashboard display order.
pub struct StrategyRegistry {
    modules: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn from_config(cfg: &ModulesConfig) -> Self {
        let modules: Vec<Box<dyn Strategy>> = vec![
            Box::new(cfg.trend_following.clone()),
            Box::new(cfg.breakout.clone()),
            Box::new(cfg.mean_reversion.clone()),
            Box::new(cfg.funding_arbitrage.clone()),
            Box::new(cfg.momentum_scalp.clone()),
        ];
        for module in &modules {
            info!(module = module.name(), "Registered strategy module");
        }
        Self { modules }
    }

    /// All five modules with built-in default tuning.
    pub fn standard() -> Self {
        Self::from_config(&ModulesConfig::default())
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.modules.iter().map(|m| m.as_ref())
    }

    /// Evaluate every module against one consistent snapshot.
    pub fn evaluate_all<'a>(
        &'a self,
        snapshot: &[MarketRecord],
    ) -> Vec<(&'a str, Option<TradeSignal>)> {
        self.modules
            .iter()
            .map(|m| (m.name(), m.evaluate(snapshot)))
            .collect()
    }

    /// Derive the dashboard view of each module from the open trades and
    /// the set of trade ids with a close in flight.
    pub fn module_views(
        &self,
        active: &[ActiveTrade],
        closing: &HashSet<i64>,
    ) -> Vec<StrategyModuleView> {
        self.modules
            .iter()
            .map(|m| {
                let open = active.iter().find(|t| t.module_name == m.name());
                let status = match open {
                    Some(t) if closing.contains(&t.trade_id) => ModuleStatus::Closing,
                    Some(_) => ModuleStatus::TradeOpen,
                    None => ModuleStatus::Scanning,
                };
                StrategyModuleView {
                    name: m.name().to_string(),
                    description: m.description().to_string(),
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::TradeDirection;

    fn active(trade_id: i64, module_name: &str) -> ActiveTrade {
        ActiveTrade {
            trade_id,
            module_name: module_name.to_string(),
            symbol: "BTCUSDT".to_string(),
            direction: TradeDirection::Long,
            entry_price: 50_000.0,
            opened_at: Utc::now(),
        }
    }

    #[test]
    fn registry_holds_the_five_fixed_modules() {
        let registry = StrategyRegistry::standard();
        let names: Vec<&str> = registry.modules().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec![
                "Trend Following",
                "Breakout",
                "Mean Reversion",
                "Funding Rate Arbitrage",
                "Momentum Scalp",
            ]
        );
    }

    #[test]
    fn evaluate_all_returns_one_entry_per_module() {
        let registry = StrategyRegistry::standard();
        let results = registry.evaluate_all(&[]);
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|(_, sig)| sig.is_none()));
    }

    #[test]
    fn module_status_derivation() {
        let registry = StrategyRegistry::standard();
        let open = vec![active(1, "Breakout"), active(2, "Momentum Scalp")];
        let closing = HashSet::from([2]);

        let views = registry.module_views(&open, &closing);
        let by_name = |name: &str| views.iter().find(|v| v.name == name).unwrap();
        assert_eq!(by_name("Breakout").status, ModuleStatus::TradeOpen);
        assert_eq!(by_name("Momentum Scalp").status, ModuleStatus::Closing);
        assert_eq!(by_name("Trend Following").status, ModuleStatus::Scanning);
    }
}

use serde::Deserialize;
use tracing::info;

use crate::evaluators::{Breakout, FundingArbitrage, MeanReversion, MomentumScalp, TrendFollowing};

/// Optional tuning file for the five strategy modules (TOML). The module
/// set is fixed; only thresholds can be overridden, and any omitted table
/// or key keeps its built-in default.
///
/// Example `config/strategies.toml`:
/// ```toml
/// [trend_following]
/// min_change_pct = 5.0
/// min_funding = 0.0001
///
/// [momentum_scalp]
/// min_abs_change_pct = 3.0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    pub trend_following: TrendFollowing,
    pub breakout: Breakout,
    pub mean_reversion: MeanReversion,
    pub funding_arbitrage: FundingArbitrage,
    pub momentum_scalp: MomentumScalp,
}

impl ModulesConfig {
    /// Load from a TOML file; a missing file falls back to built-in
    /// defaults. A present but malformed file exits the process — silently
    /// trading with half-applied tuning is worse than not starting.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse strategy config at '{path}': {e}")),
            Err(_) => {
                info!(path, "No strategy config file — using built-in defaults");
                Self::default()
            }
        }
    }
}

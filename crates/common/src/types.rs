use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of a paper trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "LONG"),
            TradeDirection::Short => write!(f, "SHORT"),
        }
    }
}

/// Outcome of a closed trade. Win covers break-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeResult {
    Win,
    Loss,
}

impl TradeResult {
    /// Win iff the final PnL is non-negative.
    pub fn from_pnl(final_pnl: f64) -> Self {
        if final_pnl >= 0.0 {
            TradeResult::Win
        } else {
            TradeResult::Loss
        }
    }

    /// Parses the wire representation ("WIN" / "LOSS", case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "WIN" => Some(TradeResult::Win),
            "LOSS" => Some(TradeResult::Loss),
            _ => None,
        }
    }
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Win => write!(f, "WIN"),
            TradeResult::Loss => write!(f, "LOSS"),
        }
    }
}

/// Asset category. Derived from the symbol text alone; Infrastructure is
/// the catch-all for symbols matching no keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    L1,
    L2,
    #[serde(rename = "AI")]
    Ai,
    DeFi,
    Meme,
    Gaming,
    Infrastructure,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::L1,
        Category::L2,
        Category::Ai,
        Category::DeFi,
        Category::Meme,
        Category::Gaming,
        Category::Infrastructure,
    ];

    /// Long-form name shown on the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::L1 => "Layer 1",
            Category::L2 => "Layer 2",
            Category::Ai => "AI & ML",
            Category::DeFi => "DeFi",
            Category::Meme => "Meme Coins",
            Category::Gaming => "Gaming",
            Category::Infrastructure => "Infrastructure",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::L1 => "L1",
            Category::L2 => "L2",
            Category::Ai => "AI",
            Category::DeFi => "DeFi",
            Category::Meme => "Meme",
            Category::Gaming => "Gaming",
            Category::Infrastructure => "Infrastructure",
        };
        write!(f, "{s}")
    }
}

/// Overall read on a symbol derived from its 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketBias {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for MarketBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketBias::Bullish => write!(f, "BULLISH"),
            MarketBias::Bearish => write!(f, "BEARISH"),
            MarketBias::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Raw 24h ticker statistics for one symbol, as returned by the
/// market-data source before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerStats {
    pub symbol: String,
    pub last_price: f64,
    /// 24h price change in percent (5.2 = +5.2%).
    pub change_pct_24h: f64,
    /// 24h quote-asset volume.
    pub quote_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

/// One symbol's merged market view, recomputed every poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub symbol: String,
    pub price: f64,
    /// 24h price change in percent.
    pub change_24h: f64,
    /// 24h quote-asset volume.
    pub volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    /// Current funding rate; 0 when the source has no entry for the symbol.
    pub funding_rate: f64,
    pub category: Category,
    /// Unbounded relative ranking score; see `market::momentum_score`.
    pub momentum: f64,
}

/// A full, consistent view of the market at one poll instant.
///
/// Shared as `Arc<MarketSnapshot>` so every consumer of a cycle evaluates
/// against the same immutable data.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub records: Vec<MarketRecord>,
    pub taken_at: DateTime<Utc>,
}

/// Signal emitted by a strategy module: open a trade on this symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: String,
    pub direction: TradeDirection,
    /// Market price of the chosen symbol at evaluation time.
    pub entry_price: f64,
}

/// An open paper trade, owned by the trade store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTrade {
    /// Monotonic identifier assigned by the store at creation.
    pub trade_id: i64,
    /// The strategy module that opened the trade. At most one active trade
    /// per module exists at a time (enforced by the lifecycle manager).
    pub module_name: String,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub opened_at: DateTime<Utc>,
}

/// A closed paper trade. Carries the same id as the active trade it came
/// from; the active → closed transition is one-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub trade_id: i64,
    pub module_name: String,
    pub symbol: String,
    /// Final PnL in percent at close time.
    pub final_pnl: f64,
    pub result: TradeResult,
    pub closed_at: DateTime<Utc>,
}

/// An active trade decorated with live price, PnL and levels for display.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedTrade {
    pub trade_id: i64,
    pub module_name: String,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub current_price: f64,
    pub pnl_pct: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub stop_loss: f64,
    /// Progress toward TP1, clamped to [0, 100].
    pub progress_to_tp1: f64,
}

/// Dashboard status of a strategy module, derived each request.
///
/// `Closing` only marks an in-flight close request; it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleStatus {
    Scanning,
    TradeOpen,
    Closing,
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleStatus::Scanning => write!(f, "Scanning"),
            ModuleStatus::TradeOpen => write!(f, "TradeOpen"),
            ModuleStatus::Closing => write!(f, "Closing"),
        }
    }
}

/// What the dashboard shows for one strategy module.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyModuleView {
    pub name: String,
    pub description: String,
    pub status: ModuleStatus,
}

/// Current state of the polling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Stopped => write!(f, "stopped"),
            EngineState::Running => write!(f, "running"),
            EngineState::Paused => write!(f, "paused"),
        }
    }
}

/// Commands sent to the engine via the command channel.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Start,
    Stop,
    Pause,
    Resume,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_derivation_win_covers_break_even() {
        assert_eq!(TradeResult::from_pnl(10.0), TradeResult::Win);
        assert_eq!(TradeResult::from_pnl(0.0), TradeResult::Win);
        assert_eq!(TradeResult::from_pnl(-0.01), TradeResult::Loss);
    }

    #[test]
    fn result_parse_is_case_insensitive() {
        assert_eq!(TradeResult::parse("win"), Some(TradeResult::Win));
        assert_eq!(TradeResult::parse("LOSS"), Some(TradeResult::Loss));
        assert_eq!(TradeResult::parse("draw"), None);
    }

    #[test]
    fn direction_serializes_uppercase() {
        let json = serde_json::to_string(&TradeDirection::Long).unwrap();
        assert_eq!(json, "\"LONG\"");
        let back: TradeDirection = serde_json::from_str("\"SHORT\"").unwrap();
        assert_eq!(back, TradeDirection::Short);
    }

    #[test]
    fn category_wire_names_match_dashboard() {
        assert_eq!(serde_json::to_string(&Category::Ai).unwrap(), "\"AI\"");
        assert_eq!(serde_json::to_string(&Category::DeFi).unwrap(), "\"DeFi\"");
        assert_eq!(
            serde_json::to_string(&Category::Infrastructure).unwrap(),
            "\"Infrastructure\""
        );
    }
}

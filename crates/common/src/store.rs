use async_trait::async_trait;

use crate::{ActiveTrade, ClosedTrade, Result, TradeDirection, TradeResult};

/// Abstraction over the trade-storage collaborator.
///
/// `PaperStore` in `crates/paper` implements this in memory for paper
/// trading. The store assigns trade ids and owns both ledgers; it does NOT
/// enforce the one-active-trade-per-module invariant — the trade lifecycle
/// manager checks that before calling `create_trade`.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Record a new active trade and return its id.
    async fn create_trade(
        &self,
        module_name: &str,
        symbol: &str,
        direction: TradeDirection,
        entry_price: f64,
    ) -> Result<i64>;

    /// Close an active trade: remove it from the active ledger and append a
    /// closed record with the given final PnL. Unknown ids are an error and
    /// leave both ledgers untouched.
    async fn close_trade(&self, trade_id: i64, final_pnl: f64) -> Result<()>;

    async fn active_trades(&self) -> Result<Vec<ActiveTrade>>;

    async fn closed_trades(&self) -> Result<Vec<ClosedTrade>>;

    async fn closed_trades_by_module(&self, module_name: &str) -> Result<Vec<ClosedTrade>>;

    async fn closed_trades_by_result(&self, result: TradeResult) -> Result<Vec<ClosedTrade>>;
}

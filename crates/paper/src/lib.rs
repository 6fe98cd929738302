use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use common::{
    ActiveTrade, ClosedTrade, Error, Result, TradeDirection, TradeResult, TradeStore,
};

/// In-memory implementation of the trade-store collaborator.
///
/// Ids are monotonic starting at 1. Closing moves the record from the
/// active ledger to the append-only closed ledger; the transition is
/// one-way and the result is derived as Win iff the final PnL is
/// non-negative. The store does NOT enforce the one-trade-per-module
/// invariant — that belongs to the trade lifecycle manager.
pub struct PaperStore {
    inner: Arc<RwLock<Ledgers>>,
}

struct Ledgers {
    next_id: i64,
    active: Vec<ActiveTrade>,
    closed: Vec<ClosedTrade>,
}

impl PaperStore {
    pub fn new() -> Self {
        info!("PaperStore initialized");
        Self {
            inner: Arc::new(RwLock::new(Ledgers {
                next_id: 1,
                active: Vec::new(),
                closed: Vec::new(),
            })),
        }
    }
}

impl Default for PaperStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeStore for PaperStore {
    async fn create_trade(
        &self,
        module_name: &str,
        symbol: &str,
        direction: TradeDirection,
        entry_price: f64,
    ) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let trade_id = inner.next_id;
        inner.next_id += 1;
        inner.active.push(ActiveTrade {
            trade_id,
            module_name: module_name.to_string(),
            symbol: symbol.to_string(),
            direction,
            entry_price,
            opened_at: Utc::now(),
        });
        info!(trade_id, module = module_name, symbol, "Active trade recorded");
        Ok(trade_id)
    }

    async fn close_trade(&self, trade_id: i64, final_pnl: f64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let idx = inner
            .active
            .iter()
            .position(|t| t.trade_id == trade_id)
            .ok_or(Error::TradeNotFound(trade_id))?;
        let trade = inner.active.remove(idx);
        inner.closed.push(ClosedTrade {
            trade_id: trade.trade_id,
            module_name: trade.module_name,
            symbol: trade.symbol,
            final_pnl,
            result: TradeResult::from_pnl(final_pnl),
            closed_at: Utc::now(),
        });
        info!(trade_id, final_pnl, "Trade moved to closed ledger");
        Ok(())
    }

    async fn active_trades(&self) -> Result<Vec<ActiveTrade>> {
        Ok(self.inner.read().await.active.clone())
    }

    async fn closed_trades(&self) -> Result<Vec<ClosedTrade>> {
        Ok(self.inner.read().await.closed.clone())
    }

    async fn closed_trades_by_module(&self, module_name: &str) -> Result<Vec<ClosedTrade>> {
        Ok(self
            .inner
            .read()
            .await
            .closed
            .iter()
            .filter(|t| t.module_name == module_name)
            .cloned()
            .collect())
    }

    async fn closed_trades_by_result(&self, result: TradeResult) -> Result<Vec<ClosedTrade>> {
        Ok(self
            .inner
            .read()
            .await
            .closed
            .iter()
            .filter(|t| t.result == result)
            .cloned()
            .collect())
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use common::{
    ActiveTrade, EngineState, EnrichedTrade, Error, MarketRecord, MarketSnapshot, Result,
    StrategyModuleView, TradeStore,
};
use market::levels;
use strategy::StrategyRegistry;

use crate::feed::SnapshotCache;

/// Cloneable handle for request-time trade operations (dashboard API).
#[derive(Clone)]
pub struct ManagerHandle {
    store: Arc<dyn TradeStore>,
    cache: SnapshotCache,
    registry: Arc<StrategyRegistry>,
    pending_closes: Arc<RwLock<HashSet<i64>>>,
}

impl ManagerHandle {
    /// Close an active trade at the latest known price and return the
    /// final PnL in percent.
    ///
    /// PnL is direction-aware: a SHORT closed below entry is a win. The
    /// trade only counts as closed once the store confirms; on store
    /// failure it stays open and the error is returned to the caller.
    pub async fn close_trade(&self, trade_id: i64) -> Result<f64> {
        let trade = self
            .store
            .active_trades()
            .await?
            .into_iter()
            .find(|t| t.trade_id == trade_id)
            .ok_or(Error::TradeNotFound(trade_id))?;

        // Symbol momentarily absent from the snapshot → flat close at entry.
        let current_price = match self.cache.latest().await {
            Some(snapshot) => snapshot
                .records
                .iter()
                .find(|r| r.symbol == trade.symbol)
                .map(|r| r.price)
                .unwrap_or(trade.entry_price),
            None => trade.entry_price,
        };
        let final_pnl = levels::pnl_percent(trade.entry_price, current_price, trade.direction);

        self.pending_closes.write().await.insert(trade_id);
        let result = self.store.close_trade(trade_id, final_pnl).await;
        self.pending_closes.write().await.remove(&trade_id);

        match result {
            Ok(()) => {
                info!(
                    trade_id,
                    module = %trade.module_name,
                    symbol = %trade.symbol,
                    final_pnl,
                    "Trade closed"
                );
                Ok(final_pnl)
            }
            Err(e) => {
                warn!(trade_id, error = %e, "Close failed — trade remains open");
                Err(e)
            }
        }
    }

    /// The five module views with live status for the dashboard.
    pub async fn module_views(&self) -> Result<Vec<StrategyModuleView>> {
        let active = self.store.active_trades().await?;
        let closing = self.pending_closes.read().await.clone();
        Ok(self.registry.module_views(&active, &closing))
    }

    /// Active trades decorated with live price, PnL and levels.
    pub async fn enriched_trades(&self) -> Result<Vec<EnrichedTrade>> {
        let active = self.store.active_trades().await?;
        let snapshot = self.cache.latest().await;
        let records = snapshot.as_ref().map(|s| s.records.as_slice()).unwrap_or(&[]);
        Ok(enrich_trades(&active, records))
    }
}

/// Drives the per-module trade state machine: Scanning ⇄ TradeOpen.
///
/// Consumes market snapshots from the engine broadcast, runs each idle
/// module's evaluator against the full snapshot, and opens a paper trade
/// through the store when a module signals. Opens are suppressed unless the
/// engine is Running.
pub struct TradeLifecycleManager {
    registry: Arc<StrategyRegistry>,
    store: Arc<dyn TradeStore>,
    snapshot_rx: broadcast::Receiver<Arc<MarketSnapshot>>,
    engine_state: Arc<RwLock<EngineState>>,
    /// Modules with an evaluate→open in flight. Serializes the pass per
    /// module so overlapping cycles cannot double-open.
    in_flight: HashSet<String>,
    pending_closes: Arc<RwLock<HashSet<i64>>>,
}

impl TradeLifecycleManager {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        store: Arc<dyn TradeStore>,
        snapshot_rx: broadcast::Receiver<Arc<MarketSnapshot>>,
        engine_state: Arc<RwLock<EngineState>>,
        cache: SnapshotCache,
    ) -> (Self, ManagerHandle) {
        let pending_closes = Arc::new(RwLock::new(HashSet::new()));

        let handle = ManagerHandle {
            store: store.clone(),
            cache,
            registry: registry.clone(),
            pending_closes: pending_closes.clone(),
        };

        let manager = TradeLifecycleManager {
            registry,
            store,
            snapshot_rx,
            engine_state,
            in_flight: HashSet::new(),
            pending_closes,
        };

        (manager, handle)
    }

    /// Run the manager loop. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!("Trade lifecycle manager running");
        loop {
            match self.snapshot_rx.recv().await {
                Ok(snapshot) => {
                    if *self.engine_state.read().await != EngineState::Running {
                        continue; // paused/stopped — no trade opens
                    }
                    self.process_cycle(&snapshot).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(dropped = n, "Manager lagged — dropped market snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!("Snapshot channel closed — manager exiting");
                    return;
                }
            }
        }
    }

    /// One evaluate→open pass over a consistent snapshot.
    ///
    /// Cross-references open trades with a single store call, then walks
    /// the modules in registration order. A store failure on create leaves
    /// the module in Scanning; it simply retries next cycle.
    async fn process_cycle(&mut self, snapshot: &MarketSnapshot) {
        let active = match self.store.active_trades().await {
            Ok(active) => active,
            Err(e) => {
                warn!(error = %e, "Could not list active trades — skipping cycle");
                return;
            }
        };

        for module in self.registry.modules() {
            let name = module.name();
            if active.iter().any(|t| t.module_name == name) {
                continue; // one open trade per module
            }
            if !self.in_flight.insert(name.to_string()) {
                continue; // open already in flight for this module
            }

            if let Some(signal) = module.evaluate(&snapshot.records) {
                info!(
                    module = name,
                    symbol = %signal.symbol,
                    direction = %signal.direction,
                    entry_price = signal.entry_price,
                    "Strategy signal — opening paper trade"
                );
                match self
                    .store
                    .create_trade(name, &signal.symbol, signal.direction, signal.entry_price)
                    .await
                {
                    Ok(trade_id) => info!(module = name, trade_id, "Paper trade opened"),
                    Err(e) => {
                        warn!(module = name, error = %e, "Trade create failed — module stays in Scanning")
                    }
                }
            }

            self.in_flight.remove(name);
        }
    }
}

/// Attach live price, PnL and levels to each active trade.
///
/// A symbol missing from the snapshot falls back to its entry price (zero
/// PnL) instead of failing — symbols occasionally drop out of the feed for
/// a cycle.
pub fn enrich_trades(active: &[ActiveTrade], records: &[MarketRecord]) -> Vec<EnrichedTrade> {
    active
        .iter()
        .map(|trade| {
            let current_price = records
                .iter()
                .find(|r| r.symbol == trade.symbol)
                .map(|r| r.price)
                .unwrap_or(trade.entry_price);
            let tps = levels::take_profits(trade.entry_price, trade.direction);
            EnrichedTrade {
                trade_id: trade.trade_id,
                module_name: trade.module_name.clone(),
                symbol: trade.symbol.clone(),
                direction: trade.direction,
                entry_price: trade.entry_price,
                current_price,
                pnl_pct: levels::pnl_percent(trade.entry_price, current_price, trade.direction),
                tp1: tps.tp1,
                tp2: tps.tp2,
                tp3: tps.tp3,
                stop_loss: levels::stop_loss(trade.entry_price, trade.direction),
                progress_to_tp1: levels::progress_to_tp1(
                    trade.entry_price,
                    current_price,
                    tps.tp1,
                    trade.direction,
                ),
            }
        })
        .collect()
}

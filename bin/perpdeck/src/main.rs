use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, EngineCommand};
use engine::{BinanceFutures, Engine, SnapshotCache, TradeLifecycleManager};
use paper::PaperStore;
use strategy::{ModulesConfig, StrategyRegistry};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(port = cfg.dashboard_port, poll_secs = cfg.market_poll_secs, "perpdeck starting");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let store: Arc<dyn common::TradeStore> = Arc::new(PaperStore::new());
    let source: Arc<dyn common::MarketDataSource> =
        Arc::new(BinanceFutures::new(&cfg.binance_fapi_url));

    // ── Engine + market feed ──────────────────────────────────────────────────
    let cache = SnapshotCache::new();
    let (engine, engine_handle) = Engine::new(
        source.clone(),
        cache.clone(),
        Duration::from_secs(cfg.market_poll_secs),
        Duration::from_secs(cfg.market_staleness_secs),
    );

    // ── Strategy modules ──────────────────────────────────────────────────────
    let modules_cfg = ModulesConfig::load_or_default(&cfg.strategy_config_path);
    let registry = Arc::new(StrategyRegistry::from_config(&modules_cfg));

    // ── Trade lifecycle manager ───────────────────────────────────────────────
    let (manager, manager_handle) = TradeLifecycleManager::new(
        registry,
        store.clone(),
        engine_handle.subscribe_snapshots(),
        engine_handle.state_handle(),
        cache.clone(),
    );

    // ── Dashboard API ─────────────────────────────────────────────────────────
    let api_state = api::AppState {
        store,
        source,
        cache,
        manager: manager_handle,
        engine: engine_handle.clone(),
        dashboard_token: cfg.dashboard_token.clone(),
    };

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    tokio::spawn(engine.run());
    tokio::spawn(manager.run());
    tokio::spawn(api::serve(api_state, cfg.dashboard_port));

    // Polling starts immediately; Stop/Pause remain available on the handle.
    engine_handle.send(EngineCommand::Start).await;

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Exiting.");
}

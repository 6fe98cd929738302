pub mod binance;
pub mod feed;
pub mod lifecycle;
pub mod manager;

pub use binance::BinanceFutures;
pub use feed::{MarketFeed, SnapshotCache};
pub use lifecycle::{Engine, EngineHandle};
pub use manager::{enrich_trades, ManagerHandle, TradeLifecycleManager};

pub mod config;
pub mod error;
pub mod market;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use market::MarketDataSource;
pub use store::TradeStore;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Market API error: {0}")]
    Market(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Trade store error: {0}")]
    Store(String),

    #[error("No active trade with id {0}")]
    TradeNotFound(i64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

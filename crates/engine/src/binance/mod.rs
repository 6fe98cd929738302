mod rest;

pub use rest::BinanceFutures;

/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Dashboard
    pub dashboard_token: String,
    pub dashboard_port: u16,

    // Market polling
    pub market_poll_secs: u64,
    pub market_staleness_secs: u64,
    pub binance_fapi_url: String,

    // Strategy tuning file path
    pub strategy_config_path: String,
}

impl Config {
    pub const DEFAULT_FAPI_URL: &'static str = "https://fapi.binance.com";

    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            dashboard_token: required_env("DASHBOARD_TOKEN"),
            dashboard_port: optional_env("DASHBOARD_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            market_poll_secs: optional_env("MARKET_POLL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            market_staleness_secs: optional_env("MARKET_STALENESS_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            binance_fapi_url: optional_env("BINANCE_FAPI_URL")
                .unwrap_or_else(|| Self::DEFAULT_FAPI_URL.to_string()),
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

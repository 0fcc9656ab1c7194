use std::env;

/// Default number of distinct symbols tracked at once.
pub const DEFAULT_MAX_SYMBOLS: usize = 10;

/// Default maximum number of samples accepted in one batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

/// Admission limits for the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsLimits {
    /// Maximum number of distinct symbols.
    pub max_symbols: usize,
    /// Maximum samples per batch.
    pub max_batch_size: usize,
}

impl Default for StatsLimits {
    fn default() -> Self {
        Self {
            max_symbols: DEFAULT_MAX_SYMBOLS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Engine admission limits.
    pub limits: StatsLimits,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let limits = StatsLimits {
            max_symbols: parse_positive(env::var("MAX_SYMBOLS").ok())
                .unwrap_or(DEFAULT_MAX_SYMBOLS),
            max_batch_size: parse_positive(env::var("MAX_BATCH_SIZE").ok())
                .unwrap_or(DEFAULT_MAX_BATCH_SIZE),
        };

        Self { host, port, limits }
    }

    /// Socket address string to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            limits: StatsLimits::default(),
        }
    }
}

// Zero is rejected: a limit of zero would make the service unusable.
fn parse_positive(value: Option<String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}

pub mod cascade;
pub mod registry;
pub mod trading_stats;
pub mod window;

pub use cascade::{TierCascade, TIER_CAPACITIES, TIER_COUNT, WINDOW_THRESHOLDS};
pub use registry::{SharedCascade, SymbolRegistry};
pub use trading_stats::{TradingStatsService, MAX_SAMPLE_MAGNITUDE, STATS_SCALE};
pub use window::{PriceKey, Sample, WindowTier};

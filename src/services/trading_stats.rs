use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::registry::SymbolRegistry;
use super::window::Sample;
use crate::config::StatsLimits;
use crate::error::{StatsError, StatsResult};
use crate::types::{TradingStats, WindowLevel};

/// Fractional digits kept by query-time rounding.
pub const STATS_SCALE: u32 = 5;

/// Largest accepted sample magnitude. Keeps the decimal accumulators well
/// inside their range for a full 100,000,000-sample history.
pub const MAX_SAMPLE_MAGNITUDE: f64 = 1e10;

/// Ingestion and windowed statistics over all tracked symbols.
pub struct TradingStatsService {
    registry: SymbolRegistry,
    limits: StatsLimits,
}

impl TradingStatsService {
    /// Create a new service.
    pub fn new(limits: StatsLimits) -> Arc<Self> {
        Arc::new(Self {
            registry: SymbolRegistry::new(limits.max_symbols),
            limits,
        })
    }

    /// Append a batch of samples for `symbol`, in order.
    ///
    /// Everything is validated before the cascade is touched, so a rejected
    /// batch leaves existing state unchanged.
    pub fn add_batch(&self, symbol: &str, values: &[f64]) -> StatsResult<()> {
        if values.len() > self.limits.max_batch_size {
            warn!(
                "Batch rejected: size {} exceeds {} for symbol '{}'",
                values.len(),
                self.limits.max_batch_size,
                symbol
            );
            return Err(StatsError::BatchTooLarge {
                max: self.limits.max_batch_size,
            });
        }

        let samples = values
            .iter()
            .enumerate()
            .map(|(index, &value)| to_sample(index, value))
            .collect::<StatsResult<Vec<_>>>()
            .inspect_err(|e| warn!("Batch rejected for symbol '{}': {}", symbol, e))?;

        let cascade = self.registry.get_or_create(symbol)?;
        let mut cascade = cascade
            .write()
            .map_err(|_| StatsError::Internal(format!("cascade lock poisoned for '{}'", symbol)))?;

        for sample in samples {
            cascade.insert(sample);
        }

        info!(
            "Batch added for symbol '{}': {} values ({} retained)",
            symbol,
            values.len(),
            cascade.total_retained()
        );
        Ok(())
    }

    /// Statistics over the most recent window at `level` (1..=8).
    ///
    /// `avg` and `variance` cover only the window; `min` and `max` cover
    /// every retained sample of the symbol.
    pub fn calculate_stats(&self, symbol: &str, level: i64) -> StatsResult<TradingStats> {
        let level = WindowLevel::new(level)
            .inspect_err(|_| warn!("Stats rejected: invalid level {} for '{}'", level, symbol))?;

        let cascade = self.registry.lookup(symbol).ok_or_else(|| {
            warn!("Stats rejected: symbol '{}' not found", symbol);
            StatsError::SymbolNotFound
        })?;
        let cascade = cascade
            .read()
            .map_err(|_| StatsError::Internal(format!("cascade lock poisoned for '{}'", symbol)))?;

        let required = level.threshold();
        let retained = cascade.total_retained();
        if retained < required {
            warn!(
                "Stats rejected: {} has {} samples, {} needs {}",
                symbol, retained, level, required
            );
            return Err(StatsError::InsufficientData {
                level: level.level(),
                required,
            });
        }

        let (sum, sum_sq) = cascade.aggregate_through(level.tier_index());
        let (avg, variance) = windowed_moments(sum, sum_sq, required)?;

        let (min, max) = cascade
            .global_extrema()
            .ok_or_else(|| StatsError::Internal("no extrema for populated cascade".to_string()))?;
        let last = cascade
            .most_recent()
            .ok_or_else(|| StatsError::Internal("no recent value for populated cascade".to_string()))?;

        let stats = TradingStats {
            min,
            max,
            last,
            avg: to_f64(avg)?,
            variance: to_f64(variance)?,
        };

        debug!(
            "Stats for '{}' at {}: min={}, max={}, avg={}, variance={}, last={}",
            symbol, level, stats.min, stats.max, stats.avg, stats.variance, stats.last
        );
        Ok(stats)
    }

    /// Number of tracked symbols.
    pub fn symbol_count(&self) -> usize {
        self.registry.symbol_count()
    }

    /// Tracked symbol names, sorted.
    pub fn symbols(&self) -> Vec<String> {
        self.registry.symbols()
    }

    /// Total samples currently retained for `symbol`.
    pub fn retained(&self, symbol: &str) -> Option<usize> {
        let cascade = self.registry.lookup(symbol)?;
        let cascade = cascade.read().ok()?;
        Some(cascade.total_retained())
    }
}

fn to_sample(index: usize, value: f64) -> StatsResult<Sample> {
    if value.abs() > MAX_SAMPLE_MAGNITUDE {
        return Err(StatsError::InvalidSample { index, value });
    }
    Sample::new(value).ok_or(StatsError::InvalidSample { index, value })
}

/// Mean and population variance of a window of `n` samples.
///
/// Both divisions in the variance are rounded separately: the squared-sum
/// term is rounded before it is subtracted.
fn windowed_moments(sum: Decimal, sum_sq: Decimal, n: usize) -> StatsResult<(Decimal, Decimal)> {
    let n = Decimal::from(n);

    let avg = round_half_up(sum / n);

    let squared_mean_term = sum
        .checked_mul(sum)
        .map(|sq| sq / n)
        .or_else(|| (sum / n).checked_mul(sum))
        .ok_or_else(|| StatsError::Internal("overflow squaring window sum".to_string()))?;
    let squared_mean_term = round_half_up(squared_mean_term);

    let spread = sum_sq
        .checked_sub(squared_mean_term)
        .ok_or_else(|| StatsError::Internal("overflow in variance numerator".to_string()))?;
    let variance = round_half_up(spread / n);

    Ok((avg, variance))
}

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(STATS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest `f64` to `value`, parsed from its decimal text so the result is
/// correctly rounded.
fn to_f64(value: Decimal) -> StatsResult<f64> {
    value
        .to_string()
        .parse::<f64>()
        .map_err(|_| StatsError::Internal(format!("{} is not representable as f64", value)))
}

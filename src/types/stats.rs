use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StatsError;
use crate::services::cascade::{TIER_COUNT, WINDOW_THRESHOLDS};

/// Windowed statistics for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingStats {
    /// Smallest retained sample.
    pub min: f64,
    /// Largest retained sample.
    pub max: f64,
    /// Most recently ingested sample.
    pub last: f64,
    /// Mean over the requested window.
    pub avg: f64,
    /// Population variance over the requested window.
    pub variance: f64,
}

/// Body of `POST /add_batch/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBatchRequest {
    pub symbol: String,
    pub values: Vec<f64>,
}

/// Query string of `GET /stats/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsQuery {
    pub symbol: String,
    pub k: i64,
}

/// One of the eight supported window sizes, numbered from 1 (10 samples)
/// to 8 (100,000,000 samples).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowLevel(u8);

impl WindowLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = TIER_COUNT as u8;

    /// Validate a raw level.
    pub fn new(level: i64) -> Result<Self, StatsError> {
        if level < Self::MIN as i64 || level > Self::MAX as i64 {
            return Err(StatsError::InvalidLevel(level));
        }
        Ok(Self(level as u8))
    }

    /// The level as requested (1-based).
    pub fn level(&self) -> usize {
        self.0 as usize
    }

    /// Index of the deepest tier that makes up this window.
    pub fn tier_index(&self) -> usize {
        self.level() - 1
    }

    /// Number of most-recent samples this window covers.
    pub fn threshold(&self) -> usize {
        WINDOW_THRESHOLDS[self.tier_index()]
    }

    /// All supported levels, smallest window first.
    pub fn all() -> impl Iterator<Item = WindowLevel> {
        (Self::MIN..=Self::MAX).map(WindowLevel)
    }
}

impl TryFrom<i64> for WindowLevel {
    type Error = StatsError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        WindowLevel::new(level)
    }
}

impl fmt::Display for WindowLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={}", self.0)
    }
}

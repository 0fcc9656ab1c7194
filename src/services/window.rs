//! A single bounded FIFO window with incrementally maintained aggregates.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

/// An ingested sample: the reported `f64` plus its exact decimal form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    value: f64,
    exact: Decimal,
}

impl Sample {
    /// Build a sample, rejecting values with no decimal representation.
    ///
    /// The decimal form is parsed from the shortest text that round-trips to
    /// `value`, so it carries every significant digit the float prints with.
    /// Values whose text needs more than 28 fractional digits fall back to
    /// scientific parsing, then to the nearest 28-digit decimal.
    ///
    /// `-0.0` is folded into `0.0` so both land on the same multiset key.
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let value = if value == 0.0 { 0.0 } else { value };
        let exact = Decimal::from_str_exact(&value.to_string())
            .or_else(|_| Decimal::from_scientific(&format!("{:e}", value)))
            .ok()
            .or_else(|| Decimal::from_f64_retain(value))?;
        Some(Self { value, exact })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn exact(&self) -> Decimal {
        self.exact
    }

    fn square(&self) -> Decimal {
        self.exact * self.exact
    }
}

/// Total ordering over sample values, used as the multiset key.
#[derive(Debug, Clone, Copy)]
pub struct PriceKey(pub f64);

impl PartialEq for PriceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Holds up to `capacity` most-recent samples, oldest first.
///
/// `samples.len()` always equals the sum of the multiset counts, and
/// `sum`/`sum_sq` are the exact sums over `samples`.
#[derive(Debug, Clone)]
pub struct WindowTier {
    capacity: usize,
    samples: VecDeque<Sample>,
    sum: Decimal,
    sum_sq: Decimal,
    occurrences: BTreeMap<PriceKey, u32>,
}

impl WindowTier {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::new(),
            sum: Decimal::ZERO,
            sum_sq: Decimal::ZERO,
            occurrences: BTreeMap::new(),
        }
    }

    /// Append a sample at the newest end.
    pub fn insert(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        self.sum += sample.exact;
        self.sum_sq += sample.square();
        *self.occurrences.entry(PriceKey(sample.value)).or_insert(0) += 1;
    }

    /// Remove and return the oldest sample, or `None` if the tier is empty.
    pub fn evict_oldest(&mut self) -> Option<Sample> {
        let sample = self.samples.pop_front()?;
        self.sum -= sample.exact;
        self.sum_sq -= sample.square();

        let key = PriceKey(sample.value);
        if let Some(count) = self.occurrences.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.occurrences.remove(&key);
            }
        }
        Some(sample)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.samples.len() > self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sum(&self) -> Decimal {
        self.sum
    }

    pub fn sum_sq(&self) -> Decimal {
        self.sum_sq
    }

    /// Smallest retained value.
    pub fn min(&self) -> Option<f64> {
        self.occurrences.keys().next().map(|k| k.0)
    }

    /// Largest retained value.
    pub fn max(&self) -> Option<f64> {
        self.occurrences.keys().next_back().map(|k| k.0)
    }

    /// Most recently appended value.
    pub fn newest(&self) -> Option<f64> {
        self.samples.back().map(|s| s.value)
    }

    /// Number of distinct values currently retained.
    pub fn distinct_values(&self) -> usize {
        self.occurrences.len()
    }
}

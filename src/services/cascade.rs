//! Chain of windows where each tier holds the next-older slice of history.

use rust_decimal::Decimal;

use super::window::{Sample, WindowTier};

/// Number of tiers per symbol.
pub const TIER_COUNT: usize = 8;

/// Capacity of each individual tier, newest first.
pub const TIER_CAPACITIES: [usize; TIER_COUNT] = [
    10,
    90,
    900,
    9_000,
    90_000,
    900_000,
    9_000_000,
    90_000_000,
];

/// Cumulative capacity of tiers `0..=i`; the window size a query at level `i + 1` covers.
pub const WINDOW_THRESHOLDS: [usize; TIER_COUNT] = [
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
];

/// Retained history for one symbol. Tier 0 holds the newest samples.
#[derive(Debug, Clone)]
pub struct TierCascade {
    tiers: [WindowTier; TIER_COUNT],
}

impl TierCascade {
    pub fn new() -> Self {
        Self {
            tiers: TIER_CAPACITIES.map(WindowTier::new),
        }
    }

    /// Cascade with custom tier sizes, so deep tiers can be filled cheaply.
    #[cfg(test)]
    pub(crate) fn with_capacities(capacities: [usize; TIER_COUNT]) -> Self {
        Self {
            tiers: capacities.map(WindowTier::new),
        }
    }

    /// Append a sample to tier 0 and push overflow towards older tiers.
    ///
    /// A tier spills at most one sample per insert, so the loop runs at most
    /// `TIER_COUNT` times, and tier `i` only spills once every `C_i` inserts.
    /// Overflow from the last tier is dropped.
    pub fn insert(&mut self, sample: Sample) {
        let mut carry = Some(sample);
        for tier in self.tiers.iter_mut() {
            let Some(sample) = carry.take() else {
                break;
            };
            tier.insert(sample);
            if tier.is_over_capacity() {
                carry = tier.evict_oldest();
            }
        }
    }

    /// Total samples retained across all tiers.
    pub fn total_retained(&self) -> usize {
        self.tiers.iter().map(WindowTier::len).sum()
    }

    /// Exact `(sum, sum of squares)` over tiers `0..=tier_index`.
    pub fn aggregate_through(&self, tier_index: usize) -> (Decimal, Decimal) {
        self.tiers
            .iter()
            .take(tier_index + 1)
            .fold((Decimal::ZERO, Decimal::ZERO), |(sum, sum_sq), tier| {
                (sum + tier.sum(), sum_sq + tier.sum_sq())
            })
    }

    /// Minimum and maximum over every retained sample, regardless of window.
    pub fn global_extrema(&self) -> Option<(f64, f64)> {
        let min = self
            .tiers
            .iter()
            .filter_map(WindowTier::min)
            .reduce(f64::min)?;
        let max = self
            .tiers
            .iter()
            .filter_map(WindowTier::max)
            .reduce(f64::max)?;
        Some((min, max))
    }

    /// The most recently inserted value.
    pub fn most_recent(&self) -> Option<f64> {
        self.tiers[0].newest()
    }

    /// Retained count per tier, newest tier first.
    pub fn tier_lengths(&self) -> [usize; TIER_COUNT] {
        let mut lengths = [0; TIER_COUNT];
        for (slot, tier) in lengths.iter_mut().zip(self.tiers.iter()) {
            *slot = tier.len();
        }
        lengths
    }
}

impl Default for TierCascade {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fill(cascade: &mut TierCascade, range: std::ops::RangeInclusive<u32>) {
        for v in range {
            cascade.insert(Sample::new(v as f64).unwrap());
        }
    }

    #[test]
    fn test_thresholds_are_cumulative_capacities() {
        let mut running = 0;
        for (capacity, threshold) in TIER_CAPACITIES.iter().zip(WINDOW_THRESHOLDS.iter()) {
            running += capacity;
            assert_eq!(running, *threshold);
        }
    }

    #[test]
    fn test_new_cascade_is_empty() {
        let cascade = TierCascade::new();
        assert_eq!(cascade.total_retained(), 0);
        assert_eq!(cascade.most_recent(), None);
        assert_eq!(cascade.global_extrema(), None);
    }

    #[test]
    fn test_overflow_moves_oldest_to_next_tier() {
        let mut cascade = TierCascade::new();
        fill(&mut cascade, 1..=11);

        assert_eq!(&cascade.tier_lengths()[..2], &[10, 1]);
        assert_eq!(cascade.total_retained(), 11);

        // Tier 0 holds 2..=11, tier 1 holds the evicted 1.
        let (sum0, _) = cascade.aggregate_through(0);
        assert_eq!(sum0, dec!(65));
        let (sum1, sum_sq1) = cascade.aggregate_through(1);
        assert_eq!(sum1, dec!(66));
        assert_eq!(sum_sq1, dec!(506));
    }

    #[test]
    fn test_tiers_fill_to_capacity() {
        let mut cascade = TierCascade::new();
        fill(&mut cascade, 1..=1_500);

        assert_eq!(cascade.tier_lengths(), [10, 90, 900, 500, 0, 0, 0, 0]);
        assert_eq!(cascade.most_recent(), Some(1_500.0));

        // Tiers 0..=2 hold exactly the most recent 1,000 samples: 501..=1500.
        let (sum, _) = cascade.aggregate_through(2);
        assert_eq!(sum, Decimal::from((501..=1_500u64).sum::<u64>()));
    }

    #[test]
    fn test_last_tier_overflow_is_discarded() {
        let mut cascade = TierCascade::with_capacities([2; TIER_COUNT]);
        fill(&mut cascade, 1..=16);
        assert_eq!(cascade.tier_lengths(), [2; TIER_COUNT]);
        assert_eq!(cascade.global_extrema(), Some((1.0, 16.0)));

        // Every further insert drops the oldest sample from the last tier.
        fill(&mut cascade, 17..=30);
        assert_eq!(cascade.total_retained(), 16);
        assert_eq!(cascade.tier_lengths(), [2; TIER_COUNT]);
        assert_eq!(cascade.global_extrema(), Some((15.0, 30.0)));
        assert_eq!(cascade.most_recent(), Some(30.0));

        let (sum, sum_sq) = cascade.aggregate_through(TIER_COUNT - 1);
        assert_eq!(sum, Decimal::from((15..=30u64).sum::<u64>()));
        assert_eq!(sum_sq, Decimal::from((15..=30u64).map(|v| v * v).sum::<u64>()));

        // The newest tier still holds the newest pair.
        let (newest, _) = cascade.aggregate_through(0);
        assert_eq!(newest, dec!(59));
    }

    #[test]
    fn test_deep_tiers_receive_samples_in_order() {
        let mut cascade = TierCascade::with_capacities([1, 1, 1, 1, 1, 2, 3, 4]);
        fill(&mut cascade, 1..=14);
        assert_eq!(cascade.tier_lengths(), [1, 1, 1, 1, 1, 2, 3, 4]);

        // Tiers 5..=7 hold 8..=9, 5..=7 and 1..=4 respectively.
        let (through_four, _) = cascade.aggregate_through(4);
        assert_eq!(through_four, dec!(60));
        let (through_six, _) = cascade.aggregate_through(6);
        assert_eq!(through_six, dec!(95));

        fill(&mut cascade, 15..=15);
        assert_eq!(cascade.total_retained(), 14);
        assert_eq!(cascade.global_extrema(), Some((2.0, 15.0)));
    }

    #[test]
    fn test_global_extrema_spans_all_tiers() {
        let mut cascade = TierCascade::new();
        cascade.insert(Sample::new(-4.0).unwrap());
        fill(&mut cascade, 1..=20);
        cascade.insert(Sample::new(100.0).unwrap());

        assert_eq!(cascade.global_extrema(), Some((-4.0, 100.0)));
        assert_eq!(cascade.most_recent(), Some(100.0));
    }

    #[test]
    fn test_extrema_follow_eviction_within_tier() {
        let mut cascade = TierCascade::new();
        fill(&mut cascade, 1..=5);
        assert_eq!(cascade.global_extrema(), Some((1.0, 5.0)));

        // Samples only move to older tiers, they never leave history early.
        fill(&mut cascade, 6..=50);
        assert_eq!(cascade.global_extrema(), Some((1.0, 50.0)));
    }
}

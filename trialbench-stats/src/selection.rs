//! Selection Strategies
//!
//! Reduce a [`SampleSet`] to one representative value. Every strategy here
//! returns a value that was actually observed; nothing is interpolated, so the
//! same strategies work for durations and integer tick counts alike.

use crate::SampleSet;

/// Policy that picks the representative value from a set of samples.
///
/// Implementations must handle a single-element set and sets with duplicates.
/// `None` is reserved for an empty set.
pub trait SelectionStrategy<T> {
    /// Pick the representative value
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T>;
}

impl<T, F> SelectionStrategy<T> for F
where
    F: Fn(&SampleSet<T>) -> Option<T>,
{
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T> {
        self(samples)
    }
}

/// Smallest sample. The usual choice for timing: noise only ever adds time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimum;

impl<T: Ord + Clone> SelectionStrategy<T> for Minimum {
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T> {
        samples.min().cloned()
    }
}

/// Largest sample
#[derive(Debug, Clone, Copy, Default)]
pub struct Maximum;

impl<T: Ord + Clone> SelectionStrategy<T> for Maximum {
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T> {
        samples.max().cloned()
    }
}

/// Middle sample; the lower of the two middles for an even count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl<T: Ord + Clone> SelectionStrategy<T> for Median {
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T> {
        if samples.is_empty() {
            return None;
        }
        samples.nth((samples.len() - 1) / 2).cloned()
    }
}

/// Nearest-rank percentile, `0.0..=100.0` (out-of-range values are clamped).
///
/// `Percentile(0.0)` is the minimum and `Percentile(100.0)` the maximum.
#[derive(Debug, Clone, Copy)]
pub struct Percentile(pub f64);

impl Percentile {
    /// Rank (0-based) selected from `n` sorted samples
    pub fn rank(&self, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let p = if self.0.is_nan() {
            0.0
        } else {
            self.0.clamp(0.0, 100.0) / 100.0
        };
        let rank = (p * n as f64).ceil() as usize;
        Some(rank.saturating_sub(1).min(n - 1))
    }
}

impl<T: Ord + Clone> SelectionStrategy<T> for Percentile {
    fn select_from(&self, samples: &SampleSet<T>) -> Option<T> {
        self.rank(samples.len())
            .and_then(|rank| samples.nth(rank))
            .cloned()
    }
}

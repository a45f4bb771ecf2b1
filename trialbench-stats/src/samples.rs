//! Ordered Sample Sets
//!
//! A sorted multiset of per-trial samples. Durations and tick counts each get
//! their own set so either dimension can be reduced independently.

/// Sorted multiset of samples. Duplicates are kept; insertion order is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet<T> {
    sorted: Vec<T>,
}

impl<T> Default for SampleSet<T> {
    fn default() -> Self {
        Self { sorted: Vec::new() }
    }
}

impl<T: Ord> SampleSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sorted: Vec::with_capacity(capacity),
        }
    }

    /// Insert a sample, keeping the set sorted.
    ///
    /// Equal samples are placed after existing ones.
    pub fn insert(&mut self, sample: T) {
        let idx = self.sorted.partition_point(|s| *s <= sample);
        self.sorted.insert(idx, sample);
    }

    /// Number of samples, counting duplicates
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Whether no samples have been collected
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Smallest sample
    pub fn min(&self) -> Option<&T> {
        self.sorted.first()
    }

    /// Largest sample
    pub fn max(&self) -> Option<&T> {
        self.sorted.last()
    }

    /// The `rank`-th smallest sample (0-based)
    pub fn nth(&self, rank: usize) -> Option<&T> {
        self.sorted.get(rank)
    }

    /// Samples in ascending order
    pub fn as_slice(&self) -> &[T] {
        &self.sorted
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.sorted.iter()
    }
}

impl<T: Ord> FromIterator<T> for SampleSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sorted: Vec<T> = iter.into_iter().collect();
        sorted.sort();
        Self { sorted }
    }
}

impl<T: Ord> Extend<T> for SampleSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.sorted.extend(iter);
        self.sorted.sort();
    }
}

impl<'a, T> IntoIterator for &'a SampleSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted.iter()
    }
}

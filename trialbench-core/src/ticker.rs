//! Work-unit counter handed to a workload for the length of one trial.

/// Counts discrete units of work completed during a trial.
///
/// A fresh `Ticker` is created for every trial and lent mutably to
/// [`Workload::run`](crate::Workload::run). Its final count becomes the
/// trial's tick count once the trial completes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ticker {
    count: u64,
}

impl Ticker {
    /// Create a ticker at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one unit of work
    #[inline]
    pub fn tick(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Record `n` units of work
    #[inline]
    pub fn tick_by(&mut self, n: u64) {
        self.count = self.count.saturating_add(n);
    }

    /// Units recorded so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick() {
        let mut ticker = Ticker::new();
        for _ in 0..10 {
            ticker.tick();
        }
        assert_eq!(ticker.count(), 10);
    }

    #[test]
    fn test_tick_by_saturates() {
        let mut ticker = Ticker::new();
        ticker.tick_by(u64::MAX - 1);
        ticker.tick_by(5);
        assert_eq!(ticker.count(), u64::MAX);
    }
}

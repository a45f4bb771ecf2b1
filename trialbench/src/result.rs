//! Collected samples and the selected result pair.

use crate::RunnerError;
use std::fmt;
use std::time::Duration;
use trialbench_core::TrialRecord;
use trialbench_stats::{SampleSet, SelectionStrategy};

/// Selected duration and tick count.
///
/// The two values are selected independently and need not come from the same
/// trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAndTicks {
    duration: Duration,
    ticks: u64,
}

impl TimeAndTicks {
    /// Pair a duration with a tick count
    pub fn new(duration: Duration, ticks: u64) -> Self {
        Self { duration, ticks }
    }

    /// Selected duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Selected tick count
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl fmt::Display for TimeAndTicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({} ticks)", self.duration, self.ticks)
    }
}

/// Everything collected over a series of trials.
#[derive(Debug, Clone, Default)]
pub struct TrialSamples {
    /// Duration of every trial, including failed ones
    pub durations: SampleSet<Duration>,
    /// Tick count of every trial, including failed ones
    pub ticks: SampleSet<u64>,
    /// Trials whose `run` returned an error or panicked
    pub failures: usize,
}

impl TrialSamples {
    /// Empty collection sized for `trials` trials
    pub fn with_capacity(trials: usize) -> Self {
        Self {
            durations: SampleSet::with_capacity(trials),
            ticks: SampleSet::with_capacity(trials),
            failures: 0,
        }
    }

    /// Add one completed trial
    pub fn record(&mut self, record: &TrialRecord) {
        self.durations.insert(record.duration);
        self.ticks.insert(record.ticks);
        if record.failed() {
            self.failures += 1;
        }
    }

    /// Number of trials recorded
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Whether no trial has been recorded
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Reduce each dimension with its own strategy
    pub fn select<D, K>(
        &self,
        duration_chooser: &D,
        tick_chooser: &K,
    ) -> Result<TimeAndTicks, RunnerError>
    where
        D: SelectionStrategy<Duration> + ?Sized,
        K: SelectionStrategy<u64> + ?Sized,
    {
        let duration = duration_chooser
            .select_from(&self.durations)
            .ok_or(RunnerError::EmptySelection {
                dimension: "duration",
            })?;
        let ticks = tick_chooser
            .select_from(&self.ticks)
            .ok_or(RunnerError::EmptySelection { dimension: "ticks" })?;

        Ok(TimeAndTicks::new(duration, ticks))
    }
}

//! Trial Runner
//!
//! Runs a workload a fixed number of times and reduces the samples.
//!
//! Each trial gets its own thread (through the runner's [`Launcher`]), but the
//! runner blocks until a trial has completed before creating the next one.
//! Trials therefore never overlap: the per-trial thread buys a fresh stack and
//! a fresh ticker for every run, not parallelism.
//!
//! A workload whose `run` fails still produces a sample. Its duration is
//! usually much shorter than a real run and can win a minimum selection; the
//! failure count in [`TrialSamples`] is how callers find out.

use crate::config::RunnerConfig;
use crate::{RunnerError, TimeAndTicks, TrialSamples};
use std::sync::Arc;
use std::time::Duration;
use trialbench_core::{Launcher, SharedWorkload, ThreadLauncher, Trial, TrialOptions, Workload};
use trialbench_stats::SelectionStrategy;

/// Orchestrates sequential trials over one shared workload.
#[derive(Debug, Clone)]
pub struct TrialRunner<L = ThreadLauncher> {
    launcher: L,
    options: TrialOptions,
    trials: usize,
}

impl TrialRunner<ThreadLauncher> {
    /// Runner with default options: thread per trial, 5 trials for [`run`](Self::run)
    pub fn new() -> Self {
        Self::from_config(&RunnerConfig::default())
    }

    /// Runner configured from the `[runner]` section of `trialbench.toml`
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            launcher: config.launcher(),
            options: config.trial_options(),
            trials: config.trials,
        }
    }
}

impl Default for TrialRunner<ThreadLauncher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Launcher> TrialRunner<L> {
    /// Replace the launcher, keeping options and trial count
    pub fn with_launcher<M: Launcher>(self, launcher: M) -> TrialRunner<M> {
        TrialRunner {
            launcher,
            options: self.options,
            trials: self.trials,
        }
    }

    /// Replace the per-trial options
    pub fn with_options(mut self, options: TrialOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the trial count used by [`run`](Self::run)
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Trial count used by [`run`](Self::run)
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Run `num_times` trials and return every sample collected.
    ///
    /// Stops at the first trial that ends without a measurement (failed reset
    /// or failed launch). Failed `run`s do not stop the loop.
    pub fn collect_samples<W>(
        &self,
        workload: &SharedWorkload<W>,
        num_times: usize,
    ) -> Result<TrialSamples, RunnerError>
    where
        W: Workload + 'static,
    {
        if num_times == 0 {
            return Err(RunnerError::NoTrials);
        }

        let mut samples = TrialSamples::with_capacity(num_times);
        for id in 0..num_times {
            let trial = Arc::new(Trial::new(id, Arc::clone(workload), self.options));
            trial.start(&self.launcher)?;

            let record = trial.wait()?;
            tracing::debug!(
                trial = id,
                duration = ?record.duration,
                ticks = record.ticks,
                cycles = record.cycles,
                failed = record.failed(),
                "collected sample"
            );
            samples.record(&record);
        }

        if samples.failures > 0 {
            tracing::warn!(
                failures = samples.failures,
                trials = num_times,
                "failed trials are included in the samples"
            );
        }

        Ok(samples)
    }

    /// Run `num_times` trials and select one duration and one tick count.
    ///
    /// `duration_chooser` and `tick_chooser` are applied independently, so the
    /// pair may combine values from different trials.
    pub fn collect_statistics<W, D, K>(
        &self,
        workload: &SharedWorkload<W>,
        num_times: usize,
        duration_chooser: &D,
        tick_chooser: &K,
    ) -> Result<TimeAndTicks, RunnerError>
    where
        W: Workload + 'static,
        D: SelectionStrategy<Duration> + ?Sized,
        K: SelectionStrategy<u64> + ?Sized,
    {
        self.collect_samples(workload, num_times)?
            .select(duration_chooser, tick_chooser)
    }

    /// [`collect_statistics`](Self::collect_statistics) with the configured trial count
    pub fn run<W, D, K>(
        &self,
        workload: &SharedWorkload<W>,
        duration_chooser: &D,
        tick_chooser: &K,
    ) -> Result<TimeAndTicks, RunnerError>
    where
        W: Workload + 'static,
        D: SelectionStrategy<Duration> + ?Sized,
        K: SelectionStrategy<u64> + ?Sized,
    {
        self.collect_statistics(workload, self.trials, duration_chooser, tick_chooser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialbench_core::{InlineLauncher, Ticker, shared};
    use trialbench_stats::{Maximum, Median, Minimum};

    /// Sleeps `base + 2n` milliseconds on its n-th run and ticks n times.
    struct Stepped {
        base: u64,
        runs: u64,
    }

    impl Workload for Stepped {
        fn reset(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
            self.runs += 1;
            std::thread::sleep(Duration::from_millis(self.base + 2 * self.runs));
            ticker.tick_by(self.runs);
            Ok(())
        }
    }

    fn quiet_runner() -> TrialRunner {
        TrialRunner::new().with_options(TrialOptions {
            logging: false,
            settle_before_timing: false,
        })
    }

    #[test]
    fn test_zero_trials_rejected() {
        let workload = shared(Stepped { base: 0, runs: 0 });
        let result = quiet_runner().collect_statistics(&workload, 0, &Minimum, &Minimum);
        assert!(matches!(result, Err(RunnerError::NoTrials)));
    }

    #[test]
    fn test_runs_each_trial_once() {
        let workload = shared(Stepped { base: 0, runs: 0 });
        let samples = quiet_runner().collect_samples(&workload, 4).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples.ticks.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(workload.lock().unwrap().runs, 4);
    }

    #[test]
    fn test_choosers_applied_per_dimension() {
        let workload = shared(Stepped { base: 1, runs: 0 });
        let result = quiet_runner()
            .collect_statistics(&workload, 3, &Minimum, &Maximum)
            .unwrap();

        // Shortest sleep is 3ms on the first run; the most ticks came from the last
        assert!(result.duration() >= Duration::from_millis(3));
        assert_eq!(result.ticks(), 3);
    }

    #[test]
    fn test_inline_launcher() {
        let workload = shared(Stepped { base: 0, runs: 0 });
        let runner = quiet_runner().with_launcher(InlineLauncher).with_trials(3);

        let result = runner.run(&workload, &Median, &Median).unwrap();
        assert_eq!(result.ticks(), 2);
    }

    #[test]
    fn test_boxed_strategies() {
        let workload = shared(Stepped { base: 0, runs: 0 });
        let duration_chooser: Box<dyn SelectionStrategy<Duration>> = Box::new(Maximum);
        let tick_chooser: Box<dyn SelectionStrategy<u64>> = Box::new(Minimum);

        let result = quiet_runner()
            .collect_statistics(&workload, 2, duration_chooser.as_ref(), tick_chooser.as_ref())
            .unwrap();
        assert_eq!(result.ticks(), 1);
    }
}

#![warn(missing_docs)]
//! # trialbench
//!
//! Repeatable micro-benchmark trials with pluggable sample selection.
//!
//! trialbench runs a resettable workload several times and reduces what it
//! measured to one representative duration and one tick count:
//! - **Untimed reset**: `Workload::reset` rebuilds state before the clock starts
//! - **One thread per trial**: every run gets a fresh stack and a fresh `Ticker`;
//!   trials are strictly sequential
//! - **Single-shot trials**: a `Trial` measures once and publishes its record to
//!   any number of waiters
//! - **Failure tolerant**: errors and panics in `run` are logged and counted, not
//!   propagated
//! - **Pluggable selection**: minimum, median, percentile or your own closure,
//!   chosen separately for durations and tick counts
//!
//! ## Quick Start
//!
//! ```ignore
//! use trialbench::prelude::*;
//!
//! struct Sorting { data: Vec<u64> }
//!
//! impl Workload for Sorting {
//!     fn reset(&mut self) -> anyhow::Result<()> {
//!         self.data = (0..10_000).rev().collect();
//!         Ok(())
//!     }
//!
//!     fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
//!         self.data.sort();
//!         ticker.tick_by(self.data.len() as u64);
//!         Ok(())
//!     }
//! }
//!
//! let workload = shared(Sorting { data: Vec::new() });
//! let result = TrialRunner::new().collect_statistics(&workload, 5, &Minimum, &Minimum)?;
//! println!("{result}");
//! ```

mod config;
mod error;
mod logging;
mod result;
mod runner;

pub use config::{CONFIG_FILE_NAME, LoggingConfig, RunnerConfig, TrialbenchConfig};
pub use error::RunnerError;
pub use logging::init_logging;
pub use result::{TimeAndTicks, TrialSamples};
pub use runner::TrialRunner;

// Re-export core types
pub use trialbench_core::{
    FnWorkload, InlineLauncher, Launcher, SharedWorkload, ThreadLauncher, Ticker, Trial,
    TrialBody, TrialError, TrialOptions, TrialRecord, Workload, measure, shared,
};

// Re-export stats
pub use trialbench_stats::{Maximum, Median, Minimum, Percentile, SampleSet, SelectionStrategy};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Maximum, Median, Minimum, Percentile, SelectionStrategy, Ticker, TimeAndTicks,
        TrialRunner, Workload, shared,
    };
}

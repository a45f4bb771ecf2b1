//! Runner Errors

use thiserror::Error;
use trialbench_core::TrialError;

/// Errors returned by [`TrialRunner`](crate::TrialRunner).
///
/// Workload `run` failures never show up here; they are absorbed by the trial
/// and counted in [`TrialSamples::failures`](crate::TrialSamples::failures).
#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    /// Asked to run zero trials
    #[error("at least one trial is required")]
    NoTrials,

    /// A trial ended without a measurement (reset or launch failure)
    #[error(transparent)]
    Trial(#[from] TrialError),

    /// A selection strategy returned nothing for a non-empty sample set
    #[error("selection strategy produced no {dimension} value")]
    EmptySelection {
        /// Which sample dimension ("duration" or "ticks")
        dimension: &'static str,
    },
}

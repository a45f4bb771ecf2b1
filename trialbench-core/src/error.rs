//! Trial Errors

use thiserror::Error;

/// Errors a trial can end with instead of a measurement.
///
/// Failures inside [`Workload::run`](crate::Workload::run) are not errors at
/// this level: the trial absorbs them and still reports a duration.
#[derive(Debug, Clone, Error)]
pub enum TrialError {
    /// `Workload::reset` failed, so the clock never started
    #[error("trial {trial}: workload reset failed: {message}")]
    Reset {
        /// Trial identifier
        trial: usize,
        /// Rendered reset error
        message: String,
    },

    /// The launcher could not start the trial's thread
    #[error("trial {trial}: failed to launch: {message}")]
    Launch {
        /// Trial identifier
        trial: usize,
        /// Rendered launch error
        message: String,
    },

    /// The launched body was dropped before the trial published a result
    #[error("trial {trial}: body was dropped before the trial completed")]
    Abandoned {
        /// Trial identifier
        trial: usize,
    },
}

impl TrialError {
    /// Identifier of the trial that failed
    pub fn trial(&self) -> usize {
        match self {
            TrialError::Reset { trial, .. }
            | TrialError::Launch { trial, .. }
            | TrialError::Abandoned { trial } => *trial,
        }
    }
}

#![warn(missing_docs)]
//! trialbench Core - Trial Runtime
//!
//! This crate provides the execution side of trialbench:
//! - `Workload` contract: untimed `reset`, timed `run`
//! - `Ticker` for workload-reported units of work
//! - `Trial`: one timed, single-use execution with a one-shot completion signal
//! - `Launcher`s that put each trial on its own thread of control
//! - Wall-clock plus cycle-counter timestamps (RDTSCP / CNTVCT_EL0)

mod error;
mod launcher;
pub mod measure;
mod ticker;
mod trial;
mod workload;

pub use error::TrialError;
pub use launcher::{InlineLauncher, Launcher, ThreadLauncher, TrialBody};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, `TrialRecord::cycles` is always 0.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::Timestamp;
pub use ticker::Ticker;
pub use trial::{Trial, TrialOptions, TrialRecord};
pub use workload::{FnWorkload, SharedWorkload, Workload, shared};

//! Timed Trials
//!
//! A [`Trial`] executes one run of a [`Workload`] under timing instrumentation
//! and publishes the result through a one-shot completion signal.
//!
//! ```text
//!  runner thread                      trial thread
//!  ─────────────                      ────────────
//!  Trial::new ──► start(launcher) ──► execute()
//!                                       reset()          (untimed)
//!                                       settle()         (optional)
//!                                       start = now
//!                                       run(&mut ticker)
//!                                       end = now
//!  wait() ◄──────── notify_all ◄─────── publish(record)
//! ```
//!
//! Any number of threads may block in [`Trial::wait`]; each receives the same
//! record once the trial has published it.

use crate::error::TrialError;
use crate::launcher::Launcher;
use crate::measure::{Timestamp, settle};
use crate::{SharedWorkload, Ticker, Workload};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Per-trial behavior switches, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOptions {
    /// Log trial start and end at `info` level. Failures are logged regardless.
    pub logging: bool,
    /// Call [`settle`] between reset and the start of timing
    pub settle_before_timing: bool,
}

impl Default for TrialOptions {
    fn default() -> Self {
        Self {
            logging: true,
            settle_before_timing: true,
        }
    }
}

/// What a completed trial reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    /// Wall-clock time between start and end of `run`
    pub duration: Duration,
    /// Final ticker value
    pub ticks: u64,
    /// CPU cycles between start and end (0 without a cycle counter)
    pub cycles: u64,
    /// Error or panic message if `run` did not finish normally
    pub failure: Option<String>,
}

impl TrialRecord {
    /// Whether `run` failed; the duration is then cut short by the failure
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Default)]
struct Progress {
    executed: bool,
    launched: bool,
    abandoned: bool,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    outcome: Option<Result<TrialRecord, TrialError>>,
}

/// One timed, single-use execution of a workload.
///
/// The workload is shared between trials as `Arc<Mutex<W>>`; its mutex is the
/// execution lock held across `reset` and `run`.
pub struct Trial<W> {
    id: usize,
    workload: SharedWorkload<W>,
    options: TrialOptions,
    progress: Mutex<Progress>,
    done: Condvar,
}

impl<W: Workload> Trial<W> {
    /// Create a trial that has not started yet
    pub fn new(id: usize, workload: SharedWorkload<W>, options: TrialOptions) -> Self {
        Self {
            id,
            workload,
            options,
            progress: Mutex::new(Progress::default()),
            done: Condvar::new(),
        }
    }

    /// Trial identifier
    pub fn id(&self) -> usize {
        self.id
    }

    /// Hand the trial to `launcher`, which runs [`Trial::execute`].
    ///
    /// If the launcher fails, the trial completes with [`TrialError::Launch`].
    /// If the body is dropped without finishing (a launcher that discards it,
    /// or a thread that dies before or during the run), the trial completes
    /// with [`TrialError::Abandoned`]. Either way waiters are released.
    pub fn start<L>(self: &Arc<Self>, launcher: &L) -> Result<(), TrialError>
    where
        W: 'static,
        L: Launcher + ?Sized,
    {
        let completion = Completion {
            trial: Arc::clone(self),
            rejected: false,
        };
        let launched = launcher.launch(
            format!("trial-{}", self.id),
            Box::new(move || completion.run()),
        );

        let mut progress = self.lock_progress();
        match launched {
            Ok(()) => {
                progress.launched = true;
                if progress.abandoned && progress.outcome.is_none() {
                    self.abandon(&mut progress);
                }
                Ok(())
            }
            Err(e) => {
                let err = TrialError::Launch {
                    trial: self.id,
                    message: e.to_string(),
                };
                // A body that is still running will publish its own outcome
                if progress.outcome.is_none() && (!progress.executed || progress.abandoned) {
                    progress.executed = true;
                    progress.outcome = Some(Err(err.clone()));
                    self.done.notify_all();
                }
                Err(err)
            }
        }
    }

    /// Run the trial on the current thread.
    ///
    /// # Panics
    ///
    /// Panics if the trial has already been executed. A trial measures
    /// exactly once.
    pub fn execute(&self) {
        self.claim();
        self.measure();
    }

    fn claim(&self) {
        let already_executed = {
            let mut progress = self.lock_progress();
            std::mem::replace(&mut progress.executed, true)
        };
        if already_executed {
            panic!("trial {} can only run once", self.id);
        }
    }

    fn measure(&self) {
        let mut workload = self.workload.lock().unwrap_or_else(PoisonError::into_inner);
        let name = catch_unwind(AssertUnwindSafe(|| workload.name()))
            .unwrap_or_else(|_| std::any::type_name::<W>().to_string());

        if self.options.logging {
            tracing::info!(trial = self.id, workload = %name, "starting trial");
        }

        let reset = match catch_unwind(AssertUnwindSafe(|| workload.reset())) {
            Ok(result) => result.map_err(|e| format!("{e:#}")),
            Err(panic) => Err(panic_message(panic.as_ref())),
        };
        if let Err(message) = reset {
            tracing::warn!(
                trial = self.id,
                workload = %name,
                error = %message,
                "workload reset failed"
            );
            drop(workload);
            self.publish(
                None,
                Err(TrialError::Reset {
                    trial: self.id,
                    message,
                }),
            );
            return;
        }

        let mut ticker = Ticker::new();
        if self.options.settle_before_timing {
            settle();
        }

        let start = Timestamp::now();
        self.lock_progress().start = Some(start);

        let run = catch_unwind(AssertUnwindSafe(|| workload.run(&mut ticker)));
        let end = Timestamp::now();
        drop(workload);

        let failure = match run {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{e:#}")),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };
        if let Some(message) = &failure {
            tracing::warn!(
                trial = self.id,
                workload = %name,
                error = %message,
                "workload run failed"
            );
        }

        let record = TrialRecord {
            duration: end.duration_since(start),
            ticks: ticker.count(),
            cycles: end.cycles_since(start),
            failure,
        };

        if self.options.logging {
            tracing::info!(
                trial = self.id,
                workload = %name,
                duration = ?record.duration,
                ticks = record.ticks,
                cycles = record.cycles,
                "trial finished"
            );
        }

        self.publish(Some(end), Ok(record));
    }

    /// Block until the trial completes and return its record.
    pub fn wait(&self) -> Result<TrialRecord, TrialError> {
        let mut progress = self.lock_progress();
        loop {
            if let Some(outcome) = &progress.outcome {
                return outcome.clone();
            }
            progress = self.done.wait(progress).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the trial completes and return `end - start`.
    pub fn duration(&self) -> Result<Duration, TrialError> {
        self.wait().map(|record| record.duration)
    }

    /// Block until the trial completes and return the final tick count.
    pub fn tick_count(&self) -> Result<u64, TrialError> {
        self.wait().map(|record| record.ticks)
    }

    /// When timing began; `None` until `run` is about to be called
    pub fn started_at(&self) -> Option<Timestamp> {
        self.lock_progress().start
    }

    /// When timing ended; `None` until the trial completes, and forever if
    /// reset failed
    pub fn finished_at(&self) -> Option<Timestamp> {
        self.lock_progress().end
    }

    /// Whether the trial has published a result (non-blocking)
    pub fn is_complete(&self) -> bool {
        self.lock_progress().outcome.is_some()
    }

    /// Record the end timestamp and outcome, then wake every waiter while
    /// still holding the lock.
    fn publish(&self, end: Option<Timestamp>, outcome: Result<TrialRecord, TrialError>) {
        let mut progress = self.lock_progress();
        debug_assert!(progress.outcome.is_none(), "trial {} published twice", self.id);
        if progress.end.is_none() {
            progress.end = end;
        }
        progress.outcome = Some(outcome);
        self.done.notify_all();
    }

    /// Complete a trial whose body was dropped before it could publish.
    fn abandon(&self, progress: &mut Progress) {
        tracing::warn!(trial = self.id, "trial body dropped before completing");
        progress.executed = true;
        progress.outcome = Some(Err(TrialError::Abandoned { trial: self.id }));
        self.done.notify_all();
    }

    fn lock_progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The body handed to a launcher.
///
/// Dropping it before the trial has published, whether unrun or mid-unwind,
/// completes the trial as abandoned. Until `start` has seen the launcher
/// return, that is only recorded, so a failed launch still reports
/// [`TrialError::Launch`].
struct Completion<W: Workload> {
    trial: Arc<Trial<W>>,
    rejected: bool,
}

impl<W: Workload> Completion<W> {
    fn run(mut self) {
        self.rejected = true;
        self.trial.claim();
        self.rejected = false;
        self.trial.measure();
    }
}

impl<W: Workload> Drop for Completion<W> {
    fn drop(&mut self) {
        // Another execution owns the trial
        if self.rejected {
            return;
        }

        let mut progress = self.trial.lock_progress();
        if progress.outcome.is_some() {
            return;
        }
        progress.abandoned = true;
        if progress.launched {
            self.trial.abandon(&mut progress);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked: unknown payload".to_string()
    }
}

//! Trial Launchers
//!
//! A launcher decides where a trial body runs. The trial itself only knows
//! how to execute once and publish its result; launching is kept separate so
//! the same trial can run on a dedicated thread or inline on the caller.

use crate::measure::{check_pinnable, pin_to_cpu};

/// Body handed to a launcher: executes one trial to completion.
pub type TrialBody = Box<dyn FnOnce() + Send + 'static>;

/// Scheduling primitive that runs a trial body on some thread of control.
pub trait Launcher {
    /// Start `body`. `name` identifies the trial in thread names and logs.
    ///
    /// Returning `Ok` means the body has been handed off; completion is
    /// observed through the trial, not through the launcher.
    fn launch(&self, name: String, body: TrialBody) -> std::io::Result<()>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, name: String, body: TrialBody) -> std::io::Result<()> {
        (**self).launch(name, body)
    }
}

/// Runs each trial on a freshly spawned, detached OS thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadLauncher {
    stack_size: Option<usize>,
    pin_cpu: Option<usize>,
}

impl ThreadLauncher {
    /// Launcher with the platform's default thread settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack size for trial threads, in bytes
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Pin trial threads to `cpu` before they run (best-effort, Linux only).
    ///
    /// An index outside [`PINNABLE_CPUS`](crate::measure::PINNABLE_CPUS) makes
    /// every launch fail instead.
    pub fn with_pinned_cpu(mut self, cpu: usize) -> Self {
        self.pin_cpu = Some(cpu);
        self
    }
}

impl Launcher for ThreadLauncher {
    fn launch(&self, name: String, body: TrialBody) -> std::io::Result<()> {
        if let Some(cpu) = self.pin_cpu {
            check_pinnable(cpu)?;
        }

        let mut builder = std::thread::Builder::new().name(name);
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let pin_cpu = self.pin_cpu;
        builder.spawn(move || {
            if let Some(cpu) = pin_cpu {
                if let Err(e) = pin_to_cpu(cpu) {
                    tracing::debug!(cpu, error = %e, "could not pin trial thread");
                }
            }
            body();
        })?;

        Ok(())
    }
}

/// Runs the trial body on the calling thread before returning.
///
/// Useful when debugging a workload; loses the fresh-stack isolation of
/// [`ThreadLauncher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineLauncher;

impl Launcher for InlineLauncher {
    fn launch(&self, _name: String, body: TrialBody) -> std::io::Result<()> {
        body();
        Ok(())
    }
}

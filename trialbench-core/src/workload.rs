//! Workload Contract
//!
//! A workload is a unit of work that can rebuild its own state and run again.
//! Trials call [`Workload::reset`] outside the timed region and
//! [`Workload::run`] inside it, so setup cost never shows up in a measurement.

use crate::Ticker;
use std::sync::{Arc, Mutex};

/// A workload shared across trials. The mutex is the execution lock.
pub type SharedWorkload<W> = Arc<Mutex<W>>;

/// Wrap `workload` so successive trials can run it.
pub fn shared<W: Workload>(workload: W) -> SharedWorkload<W> {
    Arc::new(Mutex::new(workload))
}

/// A resettable, ticker-aware unit of work.
pub trait Workload: Send {
    /// Prepare for a fresh, independent run. Never timed.
    fn reset(&mut self) -> anyhow::Result<()>;

    /// Execute the timed work, reporting work units through `ticker`.
    ///
    /// Errors and panics are caught by the trial; they are logged and the
    /// shortened duration is still recorded.
    fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()>;

    /// Name used in log output
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or(path).to_string()
    }
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    fn reset(&mut self) -> anyhow::Result<()> {
        (**self).reset()
    }

    fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
        (**self).run(ticker)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Workload assembled from a setup closure and a routine closure.
///
/// The setup closure plays the role of `reset` and produces the input the
/// routine consumes, mirroring the setup/routine split of an `iter_with_setup`
/// style benchmark.
///
/// ```ignore
/// use trialbench_core::FnWorkload;
///
/// let workload = FnWorkload::new(
///     "sum",
///     || Ok(vec![1u64; 1000]),
///     |v: &mut Vec<u64>, ticker| {
///         for x in v.iter() {
///             std::hint::black_box(x);
///             ticker.tick();
///         }
///         Ok(())
///     },
/// );
/// ```
pub struct FnWorkload<T, S, R> {
    name: String,
    setup: S,
    routine: R,
    input: Option<T>,
}

impl<T, S, R> FnWorkload<T, S, R>
where
    S: FnMut() -> anyhow::Result<T>,
    R: FnMut(&mut T, &mut Ticker) -> anyhow::Result<()>,
{
    /// Create a workload named `name`
    pub fn new(name: impl Into<String>, setup: S, routine: R) -> Self {
        Self {
            name: name.into(),
            setup,
            routine,
            input: None,
        }
    }
}

impl<T, S, R> Workload for FnWorkload<T, S, R>
where
    T: Send,
    S: FnMut() -> anyhow::Result<T> + Send,
    R: FnMut(&mut T, &mut Ticker) -> anyhow::Result<()> + Send,
{
    fn reset(&mut self) -> anyhow::Result<()> {
        self.input = Some((self.setup)()?);
        Ok(())
    }

    fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("{} was run without a reset", self.name))?;
        (self.routine)(input, ticker)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        resets: u32,
    }

    impl Workload for Counter {
        fn reset(&mut self) -> anyhow::Result<()> {
            self.resets += 1;
            Ok(())
        }

        fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
            ticker.tick();
            Ok(())
        }
    }

    #[test]
    fn test_default_name() {
        let counter = Counter { resets: 0 };
        assert_eq!(counter.name(), "Counter");
    }

    #[test]
    fn test_fn_workload_setup_feeds_routine() {
        let mut workload = FnWorkload::new(
            "sum",
            || Ok(vec![2u64, 3, 5]),
            |v: &mut Vec<u64>, ticker: &mut Ticker| {
                ticker.tick_by(v.iter().sum());
                Ok(())
            },
        );

        let mut ticker = Ticker::new();
        workload.reset().unwrap();
        workload.run(&mut ticker).unwrap();

        assert_eq!(ticker.count(), 10);
        assert_eq!(workload.name(), "sum");
    }

    #[test]
    fn test_fn_workload_requires_reset() {
        let mut workload = FnWorkload::new(
            "noop",
            || Ok(()),
            |_: &mut (), _: &mut Ticker| Ok(()),
        );

        let mut ticker = Ticker::new();
        assert!(workload.run(&mut ticker).is_err());
    }

    #[test]
    fn test_boxed_workload() {
        let mut boxed: Box<dyn Workload> = Box::new(Counter { resets: 0 });
        boxed.reset().unwrap();
        boxed.reset().unwrap();

        let mut ticker = Ticker::new();
        boxed.run(&mut ticker).unwrap();
        assert_eq!(ticker.count(), 1);
    }
}

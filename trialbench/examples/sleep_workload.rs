//! Measures a few small workloads with the configured runner.
//!
//! Run with: cargo run --example sleep_workload -p trialbench

use std::time::Duration;
use trialbench::prelude::*;
use trialbench::{FnWorkload, TrialbenchConfig, init_logging};

/// Sleeps for a fixed time and reports one tick per millisecond slept.
struct Nap {
    millis: u64,
}

impl Workload for Nap {
    fn reset(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn run(&mut self, ticker: &mut Ticker) -> anyhow::Result<()> {
        for _ in 0..self.millis {
            std::thread::sleep(Duration::from_millis(1));
            ticker.tick();
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let config = TrialbenchConfig::discover().unwrap_or_default();
    init_logging(config.logging.verbose);

    let runner = TrialRunner::from_config(&config.runner);

    let nap = shared(Nap { millis: 20 });
    let result = runner.run(&nap, &Minimum, &Minimum)?;
    println!("nap:        {result}");

    let sort = shared(FnWorkload::new(
        "sort",
        || Ok((0..100_000u64).rev().collect::<Vec<_>>()),
        |data: &mut Vec<u64>, ticker: &mut Ticker| {
            data.sort_unstable();
            ticker.tick_by(data.len() as u64);
            Ok(())
        },
    ));
    let result = runner.run(&sort, &Median, &Maximum)?;
    println!("sort:       {result}");

    let p90 = runner.run(&sort, &Percentile(90.0), &Minimum)?;
    println!("sort (p90): {p90}");

    Ok(())
}

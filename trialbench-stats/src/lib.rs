#![warn(missing_docs)]
//! trialbench Statistical Engine
//!
//! Order statistics over per-trial samples:
//! - `SampleSet<T>`: sorted multiset shared by the duration and tick dimensions
//! - `SelectionStrategy<T>`: reduces a set to one representative value
//! - Minimum, maximum, median and nearest-rank percentile strategies

mod samples;
mod selection;

pub use samples::SampleSet;
pub use selection::{Maximum, Median, Minimum, Percentile, SelectionStrategy};

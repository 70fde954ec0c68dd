//! Sources: producers with no upstream stream.

mod interval;

pub use interval::{interval, IntervalProducer};

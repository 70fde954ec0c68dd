//! `hotwire` is a small push-based reactive-stream library built around a hot,
//! multicast [`Stream`] hub.
//!
//! A `Stream` owns exactly one [`Producer`] and any number of subscribed
//! [`Observer`]s. The producer is started when the first observer subscribes and
//! stopped when the last one leaves, so every subscriber shares the same
//! production run. Nothing is buffered or replayed: an observer only sees what is
//! emitted while it is subscribed.
//!
//! Operators such as [`Stream::map`], [`Stream::filter`] or [`Stream::take`] are
//! lazy. They return a new `Stream` whose producer subscribes to the upstream
//! stream only once the new stream gains its first subscriber.
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use hotwire::{interval, Subscriber, TokioScheduler};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), hotwire::StreamError> {
//! let ticks = interval(Duration::from_millis(100), Arc::new(TokioScheduler::new()));
//!
//! let sum = ticks.skip(1).take(5).fold(|acc, v| acc + v, 0);
//!
//! let printer: Subscriber<u64> = Subscriber::new(
//!     |v| println!("sum: {}", v),
//!     |e| eprintln!("error: {}", e),
//!     || println!("done"),
//! );
//! sum.subscribe(Arc::new(printer))?;
//!
//! tokio::time::sleep(Duration::from_secs(1)).await;
//! # Ok(())
//! # }
//! ```

mod errors;
mod observer;
mod operators;
mod producer;
pub mod scheduler;
mod sources;
mod stream;
pub mod subscription;

pub use errors::*;
pub use observer::Observer;
pub use producer::Producer;
pub use scheduler::{ManualScheduler, Scheduler, TimerCallback, TimerHandle, TokioScheduler};
pub use sources::{interval, IntervalProducer};
pub use stream::Stream;
pub use subscription::Subscriber;

use std::sync::{Mutex, MutexGuard, PoisonError};

// No guarded state is left half-updated by a panic, so a poisoned lock is
// taken over rather than propagated.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

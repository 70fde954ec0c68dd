//! Ready-made observers.
//!
//! [`Subscriber`] wraps plain closures for the `next`, `error` and `complete`
//! signals, which covers most terminal consumers without writing an
//! [`Observer`](crate::Observer) implementation by hand.
mod subscriber;

pub use subscriber::*;

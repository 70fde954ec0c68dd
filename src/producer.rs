use std::sync::Arc;

use crate::{Observer, SharedError, StreamError};

/// A startable, stoppable source of values.
///
/// A [`Stream`] owns exactly one producer and calls [`start`] when its
/// subscriber count goes from zero to one and [`stop`] when it drops back to
/// zero. Between those two calls the producer pushes into the observer handed
/// to `start`; after `stop` it must stay silent until it is started again.
///
/// The stream guarantees that `start` is never called twice in a row and that
/// `stop` only follows a successful `start`.
///
/// [`Stream`]: crate::Stream
/// [`start`]: Producer::start
/// [`stop`]: Producer::stop
pub trait Producer<T, E = SharedError>: Send + Sync {
    /// Begins a session that pushes into `observer`.
    ///
    /// Failing to acquire an external resource is reported here, synchronously,
    /// rather than through `observer.error`.
    fn start(&self, observer: Arc<dyn Observer<T, E>>) -> Result<(), StreamError>;

    /// Ends the current session and releases whatever `start` acquired.
    fn stop(&self);
}

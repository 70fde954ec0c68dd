//! The scheduling port used by timer-driven sources.
//!
//! Sources never reach for a clock themselves. They receive a [`Scheduler`] at
//! construction and ask it to call them back periodically, which lets the same
//! source run on tokio timers in production and on a hand-cranked
//! [`ManualScheduler`] in tests.

mod manual;
mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

use std::time::Duration;

use crate::StreamError;

/// A periodic callback registered with a [`Scheduler`].
pub type TimerCallback = Box<dyn FnMut() + Send>;

/// Identifies a timer registered with a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps an implementation-defined timer id.
    pub fn from_raw(id: u64) -> Self {
        TimerHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Registers and cancels recurring timers.
pub trait Scheduler: Send + Sync {
    /// Calls `callback` once every `period` until the returned handle is
    /// canceled. The first call happens one period after scheduling.
    ///
    /// Returns [`StreamError::ResourceUnavailable`] when no timer can be
    /// acquired.
    fn schedule(&self, period: Duration, callback: TimerCallback)
        -> Result<TimerHandle, StreamError>;

    /// Cancels a timer. Unknown or already canceled handles are ignored.
    ///
    /// No new invocation is started after `cancel` returns, but an invocation
    /// already running on another thread may still finish. Callbacks that must
    /// not act after cancellation check their own flag, as
    /// [`IntervalProducer`](crate::IntervalProducer) does.
    fn cancel(&self, handle: TimerHandle);
}

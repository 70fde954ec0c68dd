use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};

use log::debug;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::{Scheduler, TimerCallback, TimerHandle};
use crate::{lock, StreamError};

/// A [`Scheduler`] backed by tokio timers.
///
/// Every timer is a spawned task looping over [`tokio::time::interval_at`].
/// Canceling a timer aborts its task; dropping the scheduler aborts all of
/// them.
///
/// Created with [`new`](TokioScheduler::new), the scheduler spawns onto
/// whichever runtime is current when [`schedule`](Scheduler::schedule) is
/// called and reports [`StreamError::ResourceUnavailable`] if there is none.
/// [`with_handle`](TokioScheduler::with_handle) pins it to one runtime so
/// timers can be scheduled from any thread.
#[derive(Default)]
pub struct TokioScheduler {
    runtime: Option<Handle>,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TimerHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(runtime: Handle) -> Self {
        TokioScheduler {
            runtime: Some(runtime),
            next_id: AtomicU64::new(0),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    fn runtime(&self) -> Result<Handle, StreamError> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current()
                .map_err(|err| StreamError::unavailable("tokio timer", err.to_string())),
        }
    }

    /// Number of running timers.
    pub fn len(&self) -> usize {
        lock(&self.tasks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        period: Duration,
        mut callback: TimerCallback,
    ) -> Result<TimerHandle, StreamError> {
        // `interval_at` panics on a zero period.
        if period.is_zero() {
            return Err(StreamError::InvalidPeriod(period));
        }
        let runtime = self.runtime()?;

        let handle = TimerHandle::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback();
            }
        });
        debug!("scheduled timer {} every {:?}", handle.id(), period);

        lock(&self.tasks).insert(handle, task);
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) {
        let task = lock(&self.tasks).remove(&handle);
        if let Some(task) = task {
            debug!("canceled timer {}", handle.id());
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in lock(&self.tasks).drain() {
            task.abort();
        }
    }
}

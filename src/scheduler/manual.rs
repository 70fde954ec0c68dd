use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};

use super::{Scheduler, TimerCallback, TimerHandle};
use crate::{lock, StreamError};

struct Timer {
    period: Duration,
    // Taken out while the callback runs so the lock is free for re-entrant
    // schedule/cancel calls.
    callback: Option<TimerCallback>,
}

/// A deterministic [`Scheduler`] that only fires when told to.
///
/// Time does not pass on its own: every call to [`tick`] fires each live timer
/// exactly once, in the order the timers were scheduled, regardless of their
/// period.
///
/// [`tick`]: ManualScheduler::tick
#[derive(Default)]
pub struct ManualScheduler {
    next_id: AtomicU64,
    timers: Mutex<BTreeMap<TimerHandle, Timer>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every live timer once and returns how many fired.
    ///
    /// A timer canceled by an earlier callback in the same tick is skipped.
    /// Timers scheduled during the tick first fire on the next one.
    pub fn tick(&self) -> usize {
        let handles: Vec<TimerHandle> = lock(&self.timers).keys().copied().collect();

        let mut fired = 0;
        for handle in handles {
            let callback = lock(&self.timers)
                .get_mut(&handle)
                .and_then(|timer| timer.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            callback();
            fired += 1;

            if let Some(timer) = lock(&self.timers).get_mut(&handle) {
                timer.callback = Some(callback);
            }
        }
        fired
    }

    /// Calls [`tick`](ManualScheduler::tick) `n` times.
    pub fn tick_n(&self, n: usize) -> usize {
        (0..n).map(|_| self.tick()).sum()
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        lock(&self.timers).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Period a live timer was scheduled with.
    pub fn period(&self, handle: TimerHandle) -> Option<Duration> {
        lock(&self.timers).get(&handle).map(|timer| timer.period)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(
        &self,
        period: Duration,
        callback: TimerCallback,
    ) -> Result<TimerHandle, StreamError> {
        let handle = TimerHandle::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.timers).insert(
            handle,
            Timer {
                period,
                callback: Some(callback),
            },
        );
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) {
        let removed = lock(&self.timers).remove(&handle);
        drop(removed);
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn tick_fires_in_schedule_order() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let fired = Arc::clone(&fired);
            scheduler
                .schedule(
                    Duration::from_millis(10 * (3 - id)),
                    Box::new(move || fired.lock().unwrap().push(id)),
                )
                .unwrap();
        }

        assert_eq!(scheduler.tick(), 3);
        assert_eq!(scheduler.tick(), 3);
        assert_eq!(*fired.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn canceled_timer_never_fires() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(Mutex::new(0));
        let count_c = Arc::clone(&count);

        let handle = scheduler
            .schedule(
                Duration::from_millis(5),
                Box::new(move || *count_c.lock().unwrap() += 1),
            )
            .unwrap();
        assert_eq!(scheduler.period(handle), Some(Duration::from_millis(5)));

        scheduler.tick();
        scheduler.cancel(handle);
        scheduler.cancel(handle);

        assert_eq!(scheduler.tick_n(3), 0);
        assert_eq!(*count.lock().unwrap(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn callback_may_cancel_a_later_timer() {
        let scheduler = Arc::new(ManualScheduler::new());
        let victim = Arc::new(Mutex::new(None::<TimerHandle>));
        let second_fired = Arc::new(Mutex::new(false));

        let victim_c = Arc::clone(&victim);
        let scheduler_c = Arc::clone(&scheduler);
        scheduler
            .schedule(
                Duration::from_millis(1),
                Box::new(move || {
                    if let Some(handle) = victim_c.lock().unwrap().take() {
                        scheduler_c.cancel(handle);
                    }
                }),
            )
            .unwrap();

        let second_fired_c = Arc::clone(&second_fired);
        let handle = scheduler
            .schedule(
                Duration::from_millis(1),
                Box::new(move || *second_fired_c.lock().unwrap() = true),
            )
            .unwrap();
        *victim.lock().unwrap() = Some(handle);

        assert_eq!(scheduler.tick(), 1);
        assert!(!*second_fired.lock().unwrap());
        assert_eq!(scheduler.len(), 1);
    }
}

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use log::debug;

use crate::{
    lock,
    scheduler::{Scheduler, TimerHandle},
    Observer, Producer, Stream, StreamError,
};

/// Creates a stream that emits `0, 1, 2, ...`, one value per `period`.
///
/// The timer is only registered while the stream has subscribers. Every new
/// activation starts counting from zero again. The stream never errors or
/// completes on its own; combine it with [`Stream::take`] to bound it.
///
/// Subscribing fails with [`StreamError::ResourceUnavailable`] if `scheduler`
/// cannot provide a timer, and with [`StreamError::InvalidPeriod`] if `period`
/// is zero.
pub fn interval(period: Duration, scheduler: Arc<dyn Scheduler>) -> Stream<u64> {
    Stream::new(IntervalProducer::new(period, scheduler))
}

/// The [`Producer`] behind [`interval`].
///
/// Use it directly with [`Stream::new`] to pick an error type other than the
/// default.
pub struct IntervalProducer {
    period: Duration,
    scheduler: Arc<dyn Scheduler>,
    session: Mutex<Option<Session>>,
}

struct Session {
    timer: TimerHandle,
    // Cleared on stop so a tick already in flight on another thread is dropped.
    live: Arc<AtomicBool>,
}

impl IntervalProducer {
    pub fn new(period: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        IntervalProducer {
            period,
            scheduler,
            session: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<E: 'static> Producer<u64, E> for IntervalProducer {
    fn start(&self, observer: Arc<dyn Observer<u64, E>>) -> Result<(), StreamError> {
        if self.period.is_zero() {
            return Err(StreamError::InvalidPeriod(self.period));
        }

        let live = Arc::new(AtomicBool::new(true));
        let live_c = Arc::clone(&live);
        let mut i: u64 = 0;
        let timer = self.scheduler.schedule(
            self.period,
            Box::new(move || {
                if !live_c.load(Ordering::Acquire) {
                    return;
                }
                let value = i;
                i += 1;
                observer.next(value);
            }),
        )?;

        debug!("interval every {:?} started", self.period);
        *lock(&self.session) = Some(Session { timer, live });
        Ok(())
    }

    fn stop(&self) {
        let session = lock(&self.session).take();
        if let Some(session) = session {
            session.live.store(false, Ordering::Release);
            self.scheduler.cancel(session.timer);
            debug!("interval every {:?} stopped", self.period);
        }
    }
}

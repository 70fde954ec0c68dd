mod register_emissions;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use hotwire::{
    interval, ManualScheduler, Scheduler, StreamError, TimerCallback, TimerHandle,
    TokioScheduler,
};
use register_emissions::{Event, Recorder};

struct NoTimers;

impl Scheduler for NoTimers {
    fn schedule(&self, _: Duration, _: TimerCallback) -> Result<TimerHandle, StreamError> {
        Err(StreamError::ResourceUnavailable {
            resource: "timer",
            reason: "all timers in use".to_string(),
        })
    }

    fn cancel(&self, _: TimerHandle) {}
}

// Keeps every callback after `cancel`, like a tick already running on
// another worker when its timer is aborted.
#[derive(Default)]
struct LateTicks {
    callbacks: Mutex<Vec<TimerCallback>>,
}

impl LateTicks {
    fn fire(&self, timer: usize) {
        if let Some(callback) = self.callbacks.lock().unwrap().get_mut(timer) {
            callback();
        }
    }
}

impl Scheduler for LateTicks {
    fn schedule(&self, _: Duration, callback: TimerCallback) -> Result<TimerHandle, StreamError> {
        let mut callbacks = self.callbacks.lock().unwrap();
        callbacks.push(callback);
        Ok(TimerHandle::from_raw(callbacks.len() as u64))
    }

    fn cancel(&self, _: TimerHandle) {}
}

#[test]
fn counts_from_zero_on_every_tick() {
    let scheduler = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::from_secs(1), scheduler.clone());
    let out = Recorder::<u64>::new();

    // Nothing is scheduled until someone subscribes.
    assert!(scheduler.is_empty());

    numbers.subscribe(out.clone()).unwrap();
    assert_eq!(scheduler.len(), 1);
    scheduler.tick_n(4);

    assert_eq!(out.values(), vec![0, 1, 2, 3]);
    assert_eq!(out.completes(), 0);
    assert_eq!(out.errors(), 0);
}

#[test]
fn last_unsubscribe_cancels_the_timer() {
    let scheduler = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::from_secs(1), scheduler.clone());
    let out = Recorder::<u64>::new();

    numbers.subscribe(out.clone()).unwrap();
    scheduler.tick_n(2);
    numbers.unsubscribe(&out);

    assert!(scheduler.is_empty());
    assert_eq!(scheduler.tick_n(5), 0);
    assert_eq!(out.values(), vec![0, 1]);
}

#[test]
fn restarts_from_zero_after_stop() {
    let scheduler = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::from_secs(1), scheduler.clone());
    let out = Recorder::<u64>::new();

    numbers.subscribe(out.clone()).unwrap();
    scheduler.tick_n(3);
    numbers.unsubscribe(&out);

    numbers.subscribe(out.clone()).unwrap();
    scheduler.tick_n(2);

    assert_eq!(out.values(), vec![0, 1, 2, 0, 1]);
}

#[test]
fn subscribers_share_one_run() {
    let scheduler = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::from_secs(1), scheduler.clone());
    let early = Recorder::<u64>::new();
    let late = Recorder::<u64>::new();

    numbers.subscribe(early.clone()).unwrap();
    scheduler.tick_n(2);

    numbers.subscribe(late.clone()).unwrap();
    assert_eq!(scheduler.len(), 1);
    scheduler.tick_n(2);

    assert_eq!(early.values(), vec![0, 1, 2, 3]);
    // No replay: the late subscriber only sees what came after it joined.
    assert_eq!(late.values(), vec![2, 3]);

    numbers.unsubscribe(&early);
    scheduler.tick();
    assert_eq!(late.values(), vec![2, 3, 4]);
}

#[test]
fn missing_timer_fails_subscribe() {
    let numbers = interval(Duration::from_secs(1), Arc::new(NoTimers));
    let out = Recorder::<u64>::new();

    let err = numbers.subscribe(out.clone()).unwrap_err();
    assert!(err.is_resource_unavailable());
    assert!(numbers.is_empty());

    // The failure surfaces through an operator chain as well, leaving every
    // stage idle.
    let chained = numbers.map(|v| v * 2);
    let err = chained.subscribe(out.clone()).unwrap_err();
    assert!(err.is_resource_unavailable());
    assert!(chained.is_empty());
    assert!(numbers.is_empty());
    assert!(out.events().is_empty());
}

#[test]
fn zero_period_is_rejected() {
    let scheduler = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::ZERO, scheduler.clone());

    let err = numbers.subscribe(Recorder::<u64>::new()).unwrap_err();

    assert_eq!(err, StreamError::InvalidPeriod(Duration::ZERO));
    assert!(scheduler.is_empty());
}

#[tokio::test(start_paused = true)]
async fn runs_on_tokio_timers() {
    let scheduler = Arc::new(TokioScheduler::new());
    let numbers = interval(Duration::from_millis(100), scheduler.clone());
    let out = Recorder::<u64>::new();

    numbers.take(3).subscribe(out.clone()).unwrap();
    assert_eq!(scheduler.len(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(out.values(), vec![0, 1]);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(
        out.events(),
        vec![Event::Next(0), Event::Next(1), Event::Next(2), Event::Complete]
    );
    assert!(scheduler.is_empty());
}

#[test]
fn tick_after_cancel_is_dropped() {
    let scheduler = Arc::new(LateTicks::default());
    let numbers = interval(Duration::from_secs(1), scheduler.clone());
    let out = Recorder::<u64>::new();

    numbers.subscribe(out.clone()).unwrap();
    scheduler.fire(0);
    numbers.unsubscribe(&out);
    numbers.subscribe(out.clone()).unwrap();

    // The first run's timer fires once more after it was canceled.
    scheduler.fire(0);
    scheduler.fire(1);

    assert_eq!(out.values(), vec![0, 0]);
}

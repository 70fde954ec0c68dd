use std::sync::{Arc, Mutex};

use super::{Live, Sink, Upstream};
use crate::{lock, Observer, Producer, Stream, StreamError};

pub(crate) struct FoldProducer<T, R, E, F> {
    upstream: Upstream<T, E>,
    accumulate: Arc<F>,
    seed: R,
}

impl<T, R, E, F> FoldProducer<T, R, E, F>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, accumulate: F, seed: R) -> Self {
        FoldProducer {
            upstream: Upstream::new(upstream),
            accumulate: Arc::new(accumulate),
            seed,
        }
    }
}

struct FoldSession<R, E, F> {
    live: Live,
    accumulate: Arc<F>,
    // `None` only while the accumulator runs, or after an error ended the run.
    running: Mutex<Option<R>>,
    sink: Sink<R, E>,
}

impl<T, R, E, F> Observer<T, E> for FoldSession<R, E, F>
where
    R: Send,
    F: Fn(R, T) -> R + Send + Sync,
{
    fn next(&self, value: T) {
        if !self.live.get() {
            return;
        }
        let acc = lock(&self.running).take();
        if let Some(acc) = acc {
            let acc = (self.accumulate)(acc, value);
            *lock(&self.running) = Some(acc);
        }
    }

    fn error(&self, err: E) {
        if !self.live.get() {
            return;
        }
        lock(&self.running).take();
        self.sink.error(err);
    }

    fn complete(&self) {
        if !self.live.get() {
            return;
        }
        let acc = lock(&self.running).take();
        if let Some(acc) = acc {
            self.sink.next(acc);
        }
        self.sink.complete();
    }
}

impl<T, R, E, F> Producer<R, E> for FoldProducer<T, R, E, F>
where
    T: Clone + Send + 'static,
    R: Clone + Send + Sync + 'static,
    E: Clone + Send + 'static,
    F: Fn(R, T) -> R + Send + Sync + 'static,
{
    fn start(&self, sink: Sink<R, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(FoldSession {
                live,
                accumulate: Arc::clone(&self.accumulate),
                running: Mutex::new(Some(self.seed.clone())),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

use std::sync::{Arc, Mutex};

use super::{Live, Sink, Upstream};
use crate::{lock, Observer, Producer, Stream, StreamError};

pub(crate) struct LastProducer<T, E> {
    upstream: Upstream<T, E>,
}

impl<T, E> LastProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>) -> Self {
        LastProducer {
            upstream: Upstream::new(upstream),
        }
    }
}

struct LastSession<T, E> {
    live: Live,
    latest: Mutex<Option<T>>,
    sink: Sink<T, E>,
}

impl<T, E> Observer<T, E> for LastSession<T, E>
where
    T: Send,
{
    fn next(&self, value: T) {
        if !self.live.get() {
            return;
        }
        *lock(&self.latest) = Some(value);
    }

    fn error(&self, err: E) {
        if !self.live.get() {
            return;
        }
        lock(&self.latest).take();
        self.sink.error(err);
    }

    fn complete(&self) {
        if !self.live.get() {
            return;
        }
        let latest = lock(&self.latest).take();
        if let Some(value) = latest {
            self.sink.next(value);
        }
        self.sink.complete();
    }
}

impl<T, E> Producer<T, E> for LastProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn start(&self, sink: Sink<T, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(LastSession {
                live,
                latest: Mutex::new(None),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

use std::sync::{Arc, Mutex};

use super::{Live, Sink, Upstream};
use crate::{lock, Observer, Producer, Stream, StreamError};

pub(crate) struct SkipProducer<T, E> {
    upstream: Upstream<T, E>,
    amount: usize,
}

impl<T, E> SkipProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, amount: usize) -> Self {
        SkipProducer {
            upstream: Upstream::new(upstream),
            amount,
        }
    }
}

struct SkipSession<T, E> {
    live: Live,
    remaining: Mutex<usize>,
    sink: Sink<T, E>,
}

impl<T, E> Observer<T, E> for SkipSession<T, E> {
    fn next(&self, value: T) {
        if !self.live.get() {
            return;
        }
        {
            let mut remaining = lock(&self.remaining);
            if *remaining > 0 {
                *remaining -= 1;
                return;
            }
        }
        self.sink.next(value);
    }

    fn error(&self, err: E) {
        if !self.live.get() {
            return;
        }
        self.sink.error(err);
    }

    fn complete(&self) {
        if !self.live.get() {
            return;
        }
        self.sink.complete();
    }
}

impl<T, E> Producer<T, E> for SkipProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn start(&self, sink: Sink<T, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(SkipSession {
                live,
                remaining: Mutex::new(self.amount),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

use std::sync::Arc;

use super::{Live, Sink, Upstream};
use crate::{Observer, Producer, Stream, StreamError};

pub(crate) struct DebugProducer<T, E, S> {
    upstream: Upstream<T, E>,
    spy: Arc<S>,
}

impl<T, E, S> DebugProducer<T, E, S>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, spy: S) -> Self {
        DebugProducer {
            upstream: Upstream::new(upstream),
            spy: Arc::new(spy),
        }
    }
}

struct DebugSession<T, E, S> {
    live: Live,
    spy: Arc<S>,
    sink: Sink<T, E>,
}

impl<T, E, S> Observer<T, E> for DebugSession<T, E, S>
where
    S: Fn(&T) + Send + Sync,
{
    fn next(&self, value: T) {
        if !self.live.get() {
            return;
        }
        (self.spy)(&value);
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

impl<T, E, S> Producer<T, E> for DebugProducer<T, E, S>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    S: Fn(&T) + Send + Sync + 'static,
{
    fn start(&self, sink: Sink<T, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(DebugSession {
                live,
                spy: Arc::clone(&self.spy),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

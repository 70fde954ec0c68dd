use std::sync::Arc;

use super::{Live, Sink, Upstream};
use crate::{Observer, Producer, Stream, StreamError};

pub(crate) struct FilterProducer<T, E, P> {
    upstream: Upstream<T, E>,
    predicate: Arc<P>,
}

impl<T, E, P> FilterProducer<T, E, P>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, predicate: P) -> Self {
        FilterProducer {
            upstream: Upstream::new(upstream),
            predicate: Arc::new(predicate),
        }
    }
}

struct FilterSession<T, E, P> {
    live: Live,
    predicate: Arc<P>,
    sink: Sink<T, E>,
}

impl<T, E, P> Observer<T, E> for FilterSession<T, E, P>
where
    P: Fn(&T) -> bool + Send + Sync,
{
    fn next(&self, value: T) {
        if self.live.get() && (self.predicate)(&value) {
            self.sink.next(value);
        }
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

impl<T, E, P> Producer<T, E> for FilterProducer<T, E, P>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn start(&self, sink: Sink<T, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(FilterSession {
                live,
                predicate: Arc::clone(&self.predicate),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

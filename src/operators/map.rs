use std::sync::Arc;

use super::{Live, Sink, Upstream};
use crate::{Observer, Producer, Stream, StreamError};

pub(crate) struct MapProducer<T, E, F> {
    upstream: Upstream<T, E>,
    project: Arc<F>,
}

impl<T, E, F> MapProducer<T, E, F>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, project: F) -> Self {
        MapProducer {
            upstream: Upstream::new(upstream),
            project: Arc::new(project),
        }
    }
}

struct MapSession<U, E, F> {
    live: Live,
    project: Arc<F>,
    sink: Sink<U, E>,
}

impl<T, U, E, F> Observer<T, E> for MapSession<U, E, F>
where
    F: Fn(T) -> U + Send + Sync,
{
    fn next(&self, value: T) {
        if !self.live.get() {
            return;
        }
        self.sink.next((self.project)(value));
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

impl<T, U, E, F> Producer<U, E> for MapProducer<T, E, F>
where
    T: Clone + Send + 'static,
    U: 'static,
    E: Clone + Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    fn start(&self, sink: Sink<U, E>) -> Result<(), StreamError> {
        self.upstream.attach(|live| {
            Arc::new(MapSession {
                live,
                project: Arc::clone(&self.project),
                sink,
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

use std::sync::{Arc, Mutex, Weak};

use log::trace;

use super::{Live, Sink, Upstream};
use crate::{lock, Observer, Producer, Stream, StreamError};

pub(crate) struct TakeProducer<T, E> {
    upstream: Upstream<T, E>,
    amount: usize,
}

impl<T, E> TakeProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(upstream: Stream<T, E>, amount: usize) -> Self {
        TakeProducer {
            upstream: Upstream::new(upstream),
            amount,
        }
    }
}

#[derive(Default)]
struct Progress {
    taken: usize,
    done: bool,
}

struct TakeSession<T, E> {
    live: Live,
    amount: usize,
    progress: Mutex<Progress>,
    sink: Sink<T, E>,
    upstream: Stream<T, E>,
    this: Weak<TakeSession<T, E>>,
}

impl<T, E> TakeSession<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Marks the session finished. Returns `false` if it already was, or if it
    /// has been detached.
    fn finish(&self) -> bool {
        if !self.live.get() {
            return false;
        }
        let mut progress = lock(&self.progress);
        !std::mem::replace(&mut progress.done, true)
    }

    fn complete_and_detach(&self) {
        trace!("take({}) reached its limit", self.amount);
        self.sink.complete();
        // The owning producer may already have detached us if the completion
        // made the last downstream subscriber leave; unsubscribing again is a no-op.
        if let Some(this) = self.this.upgrade() {
            self.upstream.unsubscribe(&this);
        }
    }
}

impl<T, E> Observer<T, E> for TakeSession<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn next(&self, value: T) {
        let reached = {
            let mut progress = lock(&self.progress);
            if progress.done || !self.live.get() {
                return;
            }
            progress.taken += 1;
            progress.done = progress.taken >= self.amount;
            progress.done
        };
        self.sink.next(value);
        if reached {
            self.complete_and_detach();
        }
    }

    fn error(&self, err: E) {
        if self.finish() {
            self.sink.error(err);
        }
    }

    fn complete(&self) {
        if self.finish() {
            self.sink.complete();
        }
    }
}

impl<T, E> Producer<T, E> for TakeProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn start(&self, sink: Sink<T, E>) -> Result<(), StreamError> {
        if self.amount == 0 {
            sink.complete();
            return Ok(());
        }

        let upstream = self.upstream.stream().clone();
        let amount = self.amount;
        self.upstream.attach(|live| {
            Arc::new_cyclic(|this| TakeSession {
                live,
                amount,
                progress: Mutex::new(Progress::default()),
                sink,
                upstream,
                this: this.clone(),
            })
        })
    }

    fn stop(&self) {
        self.upstream.detach();
    }
}

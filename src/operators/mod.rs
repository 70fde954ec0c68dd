//! Operator producers.
//!
//! Each operator is a [`Producer`] owned by the stream it feeds. Starting it
//! creates a fresh session observer that holds the per-run state and subscribes
//! that session to the upstream stream; stopping it unsubscribes and drops the
//! session, so state never leaks from one run into the next.
//!
//! [`Producer`]: crate::Producer

mod debug;
mod filter;
mod fold;
mod last;
mod map;
mod skip;
mod take;

pub(crate) use debug::DebugProducer;
pub(crate) use filter::FilterProducer;
pub(crate) use fold::FoldProducer;
pub(crate) use last::LastProducer;
pub(crate) use map::MapProducer;
pub(crate) use skip::SkipProducer;
pub(crate) use take::TakeProducer;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::{lock, Observer, Stream, StreamError};

pub(crate) type Sink<T, E> = Arc<dyn Observer<T, E>>;

/// Liveness of one session. Cleared when the session is detached.
///
/// A detached session can still be handed the signal that was being fanned
/// out when it was unsubscribed, so every session checks this flag first and
/// drops the signal once it is cleared.
#[derive(Clone)]
pub(crate) struct Live(Arc<AtomicBool>);

impl Live {
    fn new() -> Self {
        Live(Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The upstream end of an operator: the stream it reads from and the session
/// currently subscribed to it.
pub(crate) struct Upstream<T, E> {
    stream: Stream<T, E>,
    link: Mutex<Option<(Sink<T, E>, Live)>>,
}

impl<T, E> Upstream<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(stream: Stream<T, E>) -> Self {
        Upstream {
            stream,
            link: Mutex::new(None),
        }
    }

    pub(crate) fn stream(&self) -> &Stream<T, E> {
        &self.stream
    }

    /// Builds a session around a fresh [`Live`] flag, subscribes it upstream
    /// and remembers it for [`detach`].
    ///
    /// The link is recorded before subscribing because a synchronous upstream
    /// may drive the session to completion, and a detach, before `subscribe`
    /// returns.
    ///
    /// [`detach`]: Upstream::detach
    pub(crate) fn attach<S>(&self, build: impl FnOnce(Live) -> Arc<S>) -> Result<(), StreamError>
    where
        S: Observer<T, E> + 'static,
    {
        let live = Live::new();
        let session: Sink<T, E> = build(live.clone());
        *lock(&self.link) = Some((Arc::clone(&session), live));
        self.stream.subscribe(session).map_err(|err| {
            if let Some((_, live)) = lock(&self.link).take() {
                live.end();
            }
            err
        })
    }

    pub(crate) fn detach(&self) {
        let link = lock(&self.link).take();
        if let Some((session, live)) = link {
            live.end();
            self.stream.unsubscribe(&session);
        }
    }
}

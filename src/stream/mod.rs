//! The multicast [`Stream`] hub and its operator factories.

use std::{fmt::Debug, sync::Arc, sync::Mutex};

use log::debug;

use crate::{
    lock,
    operators::{
        DebugProducer, FilterProducer, FoldProducer, LastProducer, MapProducer, SkipProducer,
        TakeProducer,
    },
    Observer, Producer, SharedError, StreamError,
};

type Sink<T, E> = Arc<dyn Observer<T, E>>;

/// A hot, multicast hub that owns one [`Producer`] and fans its output out to
/// every subscribed [`Observer`].
///
/// The producer is started when the subscriber count goes from zero to one and
/// stopped when it falls back to zero. Subscribe and unsubscribe calls that do
/// not cross zero only change membership, so all subscribers share one
/// production run and late subscribers miss whatever was emitted before they
/// joined.
///
/// `Stream` is a handle: cloning it is shallow and every clone refers to the
/// same hub.
///
/// # Re-entrancy
///
/// Every signal is delivered to a snapshot of the subscriber list taken when
/// the signal arrives. An observer that subscribes or unsubscribes (itself or
/// someone else) while being notified changes who receives the *next* signal,
/// never the one currently being delivered. No internal lock is held while an
/// observer runs.
///
/// # Threading
///
/// `Stream` is `Send + Sync` so that its producer may push from a timer
/// thread, but it expects one context at a time. `subscribe` and
/// `unsubscribe` decide to start or stop the producer under the registry lock
/// and call it after releasing that lock, so a subscribe racing an
/// unsubscribe from another thread can see its fresh run stopped by the late
/// `stop`. Callers that share a stream across threads must serialize
/// membership changes themselves.
///
/// # Example
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
///
/// use hotwire::{interval, ManualScheduler, Observer, Subscriber};
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let numbers = interval(Duration::from_millis(10), scheduler.clone());
///
/// let first: Subscriber<u64> = Subscriber::on_next(|v| println!("first: {}", v));
/// let first: Arc<dyn Observer<u64>> = Arc::new(first);
/// numbers.subscribe(Arc::clone(&first)).unwrap(); // starts the timer
///
/// scheduler.tick(); // first: 0
///
/// let second: Subscriber<u64> = Subscriber::on_next(|v| println!("second: {}", v));
/// let second: Arc<dyn Observer<u64>> = Arc::new(second);
/// numbers.subscribe(Arc::clone(&second)).unwrap();
///
/// scheduler.tick(); // first: 1, second: 1
///
/// numbers.unsubscribe(&first);
/// numbers.unsubscribe(&second); // stops the timer
/// ```
pub struct Stream<T, E = SharedError> {
    hub: Arc<Hub<T, E>>,
}

struct Hub<T, E> {
    producer: Box<dyn Producer<T, E>>,
    registry: Mutex<Registry<T, E>>,
}

struct Registry<T, E> {
    observers: Vec<Sink<T, E>>,
    num: usize,
}

impl<T, E> Clone for Stream<T, E> {
    fn clone(&self) -> Self {
        Stream {
            hub: Arc::clone(&self.hub),
        }
    }
}

// Observers are compared by the address of their shared allocation so that an
// `Arc<Concrete>` and the `Arc<dyn Observer>` made from it are the same
// subscription.
fn same_observer<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl<T, E> Stream<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle stream that owns `producer` for its whole lifetime.
    pub fn new(producer: impl Producer<T, E> + 'static) -> Self {
        Stream {
            hub: Arc::new(Hub {
                producer: Box::new(producer),
                registry: Mutex::new(Registry {
                    observers: Vec::with_capacity(4),
                    num: 0,
                }),
            }),
        }
    }

    /// Registers `observer` at the end of the notification order.
    ///
    /// The first subscriber starts the producer; later ones join the run
    /// already in progress and see only what is emitted from now on.
    /// Subscribing the same observer twice registers it twice.
    ///
    /// # Arguments
    ///
    /// - `observer`: The sink to notify. Its `Arc` allocation identifies the
    ///   subscription for [`unsubscribe`](Stream::unsubscribe).
    ///
    /// # Returns
    ///
    /// `Ok(())` once registered. If this subscription had to start the
    /// producer and starting failed, it is rolled back, the stream stays idle
    /// and the producer's [`StreamError`] is returned.
    pub fn subscribe(&self, observer: Sink<T, E>) -> Result<(), StreamError> {
        let subscribed = Arc::clone(&observer);
        let activated = {
            let mut registry = lock(&self.hub.registry);
            registry.observers.push(observer);
            registry.num += 1;
            registry.num == 1
        };
        if !activated {
            return Ok(());
        }

        debug!("stream {:p} activated", Arc::as_ptr(&self.hub));
        let sink: Sink<T, E> = Arc::new(self.clone());
        if let Err(err) = self.hub.producer.start(sink) {
            debug!("stream {:p} failed to start: {}", Arc::as_ptr(&self.hub), err);
            let removed = {
                let mut registry = lock(&self.hub.registry);
                let found = registry
                    .observers
                    .iter()
                    .rposition(|o| same_observer(o, &subscribed));
                found.map(|i| {
                    registry.num = registry.num.saturating_sub(1);
                    registry.observers.remove(i)
                })
            };
            drop(removed);
            return Err(err);
        }
        Ok(())
    }

    /// Removes the first registration of `observer`.
    ///
    /// Removing the last subscriber stops the producer, which releases
    /// whatever it holds (timers, upstream subscriptions). Called from inside a
    /// notification, the removal applies from the next signal on.
    ///
    /// # Arguments
    ///
    /// - `observer`: The same `Arc` (or a clone of it) that was passed to
    ///   [`subscribe`](Stream::subscribe). Observers that are not subscribed
    ///   are ignored.
    pub fn unsubscribe<O>(&self, observer: &Arc<O>)
    where
        O: Observer<T, E> + ?Sized,
    {
        let (removed, deactivated) = {
            let mut registry = lock(&self.hub.registry);
            let Some(i) = registry
                .observers
                .iter()
                .position(|o| same_observer(o, observer))
            else {
                return;
            };
            let removed = registry.observers.remove(i);
            registry.num -= 1;
            (removed, registry.num == 0)
        };
        // Dropping a session may release other streams, keep that outside the lock.
        drop(removed);

        if deactivated {
            debug!("stream {:p} deactivated", Arc::as_ptr(&self.hub));
            self.hub.producer.stop();
        }
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        lock(&self.hub.registry).num
    }

    /// Returns `true` when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while the owned producer is running.
    pub fn is_active(&self) -> bool {
        !self.is_empty()
    }

    fn snapshot(&self) -> Vec<Sink<T, E>> {
        lock(&self.hub.registry).observers.clone()
    }

    /// Emits `project(v)` for every value `v`.
    ///
    /// # Arguments
    ///
    /// - `project`: Called once per value, in emission order.
    ///
    /// # Returns
    ///
    /// A new idle stream of projected values. It subscribes here only when it
    /// gains its first subscriber.
    pub fn map<U, F>(&self, project: F) -> Stream<U, E>
    where
        U: Clone + Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Stream::new(MapProducer::new(self.clone(), project))
    }

    /// Emits only the values for which `predicate` returns `true`.
    pub fn filter<P>(&self, predicate: P) -> Stream<T, E>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Stream::new(FilterProducer::new(self.clone(), predicate))
    }

    /// Emits the first `amount` values, then completes and detaches from this
    /// stream.
    ///
    /// Each run counts from zero again. `take(0)` completes as soon as it is
    /// subscribed to, without ever subscribing here.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::{sync::Arc, time::Duration};
    ///
    /// use hotwire::{interval, ManualScheduler, Subscriber};
    ///
    /// let clock = Arc::new(ManualScheduler::new());
    /// let first_two = interval(Duration::from_secs(1), clock.clone()).take(2);
    ///
    /// let printer: Subscriber<u64> = Subscriber::on_next(|v| println!("{}", v));
    /// first_two.subscribe(Arc::new(printer)).unwrap();
    ///
    /// clock.tick_n(5); // prints 0 and 1, then the timer is released
    /// assert!(clock.is_empty());
    /// ```
    pub fn take(&self, amount: usize) -> Stream<T, E> {
        Stream::new(TakeProducer::new(self.clone(), amount))
    }

    /// Drops the first `amount` values and emits the rest.
    pub fn skip(&self, amount: usize) -> Stream<T, E> {
        Stream::new(SkipProducer::new(self.clone(), amount))
    }

    /// Logs every value at debug level through the `log` facade and passes it
    /// on unchanged.
    pub fn debug(&self) -> Stream<T, E>
    where
        T: Debug,
    {
        self.debug_with(|v: &T| debug!("{:?}", v))
    }

    /// Calls `spy` with every value and passes it on unchanged.
    pub fn debug_with<S>(&self, spy: S) -> Stream<T, E>
    where
        S: Fn(&T) + Send + Sync + 'static,
    {
        Stream::new(DebugProducer::new(self.clone(), spy))
    }

    /// Folds every value into a running accumulator starting at `seed`.
    ///
    /// Nothing is emitted per value. When this stream completes, the
    /// accumulator is emitted once, followed by completion. An error is
    /// forwarded alone.
    ///
    /// # Arguments
    ///
    /// - `accumulate`: Combines the accumulator with the next value.
    /// - `seed`: The starting accumulator. It is cloned at the start of every
    ///   run and emitted as is if this stream completes without values.
    pub fn fold<R, F>(&self, accumulate: F, seed: R) -> Stream<R, E>
    where
        R: Clone + Send + Sync + 'static,
        F: Fn(R, T) -> R + Send + Sync + 'static,
    {
        Stream::new(FoldProducer::new(self.clone(), accumulate, seed))
    }

    /// Emits only the final value, once this stream completes.
    ///
    /// Completion without any value produces a bare completion. An error is
    /// forwarded alone.
    pub fn last(&self) -> Stream<T, E> {
        Stream::new(LastProducer::new(self.clone()))
    }
}

impl<T, E> Observer<T, E> for Stream<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn next(&self, value: T) {
        let observers = self.snapshot();
        if let Some((last, rest)) = observers.split_last() {
            for o in rest {
                o.next(value.clone());
            }
            last.next(value);
        }
    }

    fn error(&self, err: E) {
        let observers = self.snapshot();
        if let Some((last, rest)) = observers.split_last() {
            for o in rest {
                o.error(err.clone());
            }
            last.error(err);
        }
    }

    fn complete(&self) {
        for o in self.snapshot() {
            o.complete();
        }
    }
}

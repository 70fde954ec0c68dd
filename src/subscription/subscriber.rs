use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Observer, SharedError};

type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(E) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// An observer built from closures.
///
/// Once a `Subscriber` has seen `error` or `complete` it is closed and ignores
/// every later signal, so a misbehaving producer cannot make it observe values
/// after termination.
///
/// Closures receive shared access only; keep mutable state behind a `Mutex` or
/// an atomic.
pub struct Subscriber<T, E = SharedError> {
    next_fn: NextFn<T>,
    error_fn: Option<ErrorFn<E>>,
    complete_fn: Option<CompleteFn>,
    closed: AtomicBool,
}

impl<T, E> Subscriber<T, E> {
    /// Creates a new `Subscriber` with custom handling functions for emitted
    /// values, errors, and completion.
    ///
    /// # Arguments
    ///
    /// - `next_fn`: Called with every value until the subscriber is closed.
    /// - `error_fn`: Called once with the first error, which closes the
    ///   subscriber.
    /// - `complete_fn`: Called once on completion, which closes the
    ///   subscriber.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotwire::{Observer, SharedError, Subscriber};
    ///
    /// let subscriber: Subscriber<u32> = Subscriber::new(
    ///     |v| println!("value: {}", v),
    ///     |e: SharedError| eprintln!("error: {}", e),
    ///     || println!("done"),
    /// );
    ///
    /// subscriber.next(1);
    /// subscriber.complete();
    /// assert!(subscriber.is_closed());
    /// ```
    pub fn new(
        next_fn: impl Fn(T) + Send + Sync + 'static,
        error_fn: impl Fn(E) + Send + Sync + 'static,
        complete_fn: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            error_fn: Some(Box::new(error_fn)),
            complete_fn: Some(Box::new(complete_fn)),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a `Subscriber` that only handles values. Errors and completion
    /// still close it.
    pub fn on_next(next_fn: impl Fn(T) + Send + Sync + 'static) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            error_fn: None,
            complete_fn: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Set the completion function for the Subscriber.
    pub fn on_complete(&mut self, complete_fn: impl Fn() + Send + Sync + 'static) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error-handling function for the Subscriber.
    pub fn on_error(&mut self, error_fn: impl Fn(E) + Send + Sync + 'static) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Returns `true` after `error` or `complete` was received.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

impl<T, E> Observer<T, E> for Subscriber<T, E> {
    fn next(&self, value: T) {
        if self.is_closed() {
            return;
        }
        (self.next_fn)(value);
    }

    fn error(&self, err: E) {
        if !self.close() {
            return;
        }
        if let Some(efn) = &self.error_fn {
            efn(err);
        }
    }

    fn complete(&self) {
        if !self.close() {
            return;
        }
        if let Some(cfn) = &self.complete_fn {
            cfn();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn ignores_signals_after_complete() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let completes = Arc::new(Mutex::new(0));
        let seen_c = Arc::clone(&seen);
        let completes_c = Arc::clone(&completes);

        let mut s: Subscriber<i32> = Subscriber::on_next(move |v| seen_c.lock().unwrap().push(v));
        s.on_complete(move || *completes_c.lock().unwrap() += 1);

        s.next(1);
        s.complete();
        s.next(2);
        s.complete();

        assert!(s.is_closed());
        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(*completes.lock().unwrap(), 1);
    }

    #[test]
    fn error_closes_without_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_c = Arc::clone(&seen);

        let s: Subscriber<i32, String> =
            Subscriber::on_next(move |v| seen_c.lock().unwrap().push(v));

        s.error("boom".to_string());
        s.next(7);

        assert!(s.is_closed());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn error_after_error_is_dropped() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_c = Arc::clone(&errors);

        let s: Subscriber<i32, &'static str> = Subscriber::new(
            |_| {},
            move |e| errors_c.lock().unwrap().push(e),
            || {},
        );

        s.error("first");
        s.error("second");
        s.complete();

        assert_eq!(*errors.lock().unwrap(), vec!["first"]);
    }
}

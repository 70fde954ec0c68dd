use std::sync::{Arc, Mutex};

use hotwire::{Observer, SharedError};

#[derive(Debug, Clone, PartialEq)]
pub enum Event<T> {
    Next(T),
    Error(String),
    Complete,
}

/// Observer that records every signal it receives, in order.
pub struct Recorder<T> {
    events: Mutex<Vec<Event<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Recorder {
            events: Mutex::new(Vec::with_capacity(8)),
        })
    }

    pub fn events(&self) -> Vec<Event<T>> {
        self.events.lock().unwrap().clone()
    }

    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn completes(&self) -> usize {
        self.count(|e| matches!(e, Event::Complete))
    }

    pub fn errors(&self) -> usize {
        self.count(|e| matches!(e, Event::Error(_)))
    }

    fn count(&self, f: impl Fn(&Event<T>) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| f(e)).count()
    }
}

impl<T: Send> Observer<T> for Recorder<T> {
    fn next(&self, value: T) {
        self.events.lock().unwrap().push(Event::Next(value));
    }

    fn error(&self, err: SharedError) {
        self.events.lock().unwrap().push(Event::Error(err.to_string()));
    }

    fn complete(&self) {
        self.events.lock().unwrap().push(Event::Complete);
    }
}

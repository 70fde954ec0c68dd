use std::{error::Error, sync::Arc};

use hotwire::{Observer, Producer, SharedError, StreamError};

#[derive(Debug)]
pub struct CustomError;

impl std::fmt::Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Custom error occurred")
    }
}

impl Error for CustomError {}

/// A source that emits a fixed list of values and then fails with
/// `CustomError`, synchronously, as soon as it is started.
pub struct FailingSource {
    values: Vec<u64>,
}

impl FailingSource {
    pub fn new(values: Vec<u64>) -> Self {
        FailingSource { values }
    }
}

impl Producer<u64> for FailingSource {
    fn start(&self, observer: Arc<dyn Observer<u64>>) -> Result<(), StreamError> {
        for v in &self.values {
            observer.next(*v);
        }
        let err: SharedError = Arc::new(CustomError);
        observer.error(err);
        Ok(())
    }

    fn stop(&self) {}
}

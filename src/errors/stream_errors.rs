use std::{sync::Arc, time::Duration};

use thiserror::Error;

/// Default payload carried by [`Observer::error`].
///
/// Streams never inspect the error they forward, they only clone it once per
/// subscriber, so any `Arc`-wrapped error works.
///
/// [`Observer::error`]: crate::Observer::error
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Failures reported synchronously to the caller of `subscribe` or
/// `Producer::start`.
///
/// These never travel through the observer protocol; value errors pushed by a
/// producer use [`Observer::error`] instead.
///
/// [`Observer::error`]: crate::Observer::error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A source could not acquire the external trigger it needs, such as a
    /// timer outside of a running tokio runtime.
    #[error("{resource} is unavailable: {reason}")]
    ResourceUnavailable {
        resource: &'static str,
        reason: String,
    },

    /// A periodic source was asked to fire with a zero period.
    #[error("invalid timer period {0:?}")]
    InvalidPeriod(Duration),
}

impl StreamError {
    pub(crate) fn unavailable(resource: &'static str, reason: impl Into<String>) -> Self {
        StreamError::ResourceUnavailable {
            resource,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`StreamError::ResourceUnavailable`].
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, StreamError::ResourceUnavailable { .. })
    }
}

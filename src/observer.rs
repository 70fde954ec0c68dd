use crate::SharedError;

/// A sink for the three signals a [`Stream`] can push.
///
/// Observers are shared behind `Arc` so a single value can be subscribed to
/// several streams, and so a stream can tell subscriptions apart by identity.
/// That is why every method takes `&self`; implementations keep any mutable
/// state behind interior mutability.
///
/// [`Stream`]: crate::Stream
pub trait Observer<T, E = SharedError>: Send + Sync {
    fn next(&self, value: T);
    fn error(&self, err: E);
    fn complete(&self);
}

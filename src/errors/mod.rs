mod stream_errors;

pub use stream_errors::*;

//! HTTP request handlers.

pub mod range;
pub mod stream;

pub use stream::stream_magnet;

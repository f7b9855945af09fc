//! Streaming internals: request lifecycle, response writing, guarded bodies.

pub mod body;
pub mod lifecycle;
pub mod response;

pub use body::guarded_body;
pub use lifecycle::{ArbiterState, Lifecycle};

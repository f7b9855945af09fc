//! Undertow web server
//!
//! Exposes the single streaming endpoint: `GET /api/stream?magnet=<uri>`.
//! Everything interesting happens in the request lifecycle: racing swarm
//! readiness against the client and a timeout, then streaming byte ranges
//! out of the winning file.

pub mod handlers;
pub mod server;
pub mod streaming;

pub use server::{AppState, router, run_server};

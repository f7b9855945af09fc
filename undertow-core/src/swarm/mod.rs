//! Peer-swarm engine contract.
//!
//! Undertow does not implement peer discovery or the wire protocol. It
//! consumes an external swarm engine through the traits in this module:
//! open a session for a magnet URI, wait for the engine to discover the
//! file list, read byte ranges out of a discovered file, and destroy the
//! session when the request ends. The traits keep production engines and
//! the simulated engine interchangeable.

pub mod guard;
pub mod sim;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

pub use guard::SessionGuard;
pub use sim::{Readiness, SimFile, SimSwarmEngine, SimSwarmSession};

/// Async stream of body chunks read out of a swarm file.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// A file discovered in the swarm once the engine signals readiness.
///
/// The `index` addresses the file within its session for range reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwarmFile {
    pub index: usize,
    pub name: String,
    pub length: u64,
}

/// Lifetime of a swarm session.
///
/// A session moves Initializing → Ready at most once (the engine's readiness
/// signal) and ends in Destroyed exactly once, whichever trigger gets there
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Ready,
    Destroyed,
}

impl SessionState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            SessionState::Initializing => 0,
            SessionState::Ready => 1,
            SessionState::Destroyed => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Initializing,
            1 => SessionState::Ready,
            _ => SessionState::Destroyed,
        }
    }
}

/// Errors surfaced by the swarm engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SwarmError {
    #[error("failed to open swarm session: {reason}")]
    OpenFailed { reason: String },
}

/// Entry point into the external swarm engine.
pub trait SwarmEngine: Send + Sync {
    /// Opens a session for a magnet URI.
    ///
    /// Never blocks: discovery starts asynchronously and completion is
    /// observed through [`SwarmSession::ready`]. Fails only for identifiers
    /// the engine cannot even begin resolving.
    ///
    /// # Errors
    ///
    /// - `SwarmError::OpenFailed` - The engine rejected the identifier
    fn open(&self, magnet: &str) -> Result<Arc<dyn SwarmSession>, SwarmError>;
}

/// One open swarm, scoped to a single request.
#[async_trait]
pub trait SwarmSession: Send + Sync {
    /// Resolves once the file list is known.
    ///
    /// The engine gives no ordering guarantee against its other events, and
    /// may never signal at all (for example when no peers are found), so
    /// the caller is expected to race this against a timeout.
    async fn ready(&self);

    /// Files discovered in the swarm. Only valid after [`ready`] resolved.
    ///
    /// [`ready`]: SwarmSession::ready
    fn files(&self) -> Vec<SwarmFile>;

    /// Streams the inclusive byte interval `[start, end]` of a file.
    ///
    /// `file_index` is the [`SwarmFile::index`] of a file returned by
    /// [`files`](SwarmSession::files). Callers pass intervals validated
    /// against the file length.
    fn stream_range(&self, file_index: usize, start: u64, end: u64) -> ByteStream;

    /// Releases all engine resources held by this session.
    ///
    /// The engine does NOT guarantee idempotency; callers must route every
    /// destroy through [`SessionGuard`] so it executes at most once.
    async fn destroy(&self);
}

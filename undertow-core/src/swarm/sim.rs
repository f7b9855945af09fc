//! Simulated swarm engine.
//!
//! Serves in-memory files behind the [`SwarmEngine`] contract with scripted
//! readiness behavior. The CLI uses it as a development engine; tests use it
//! to drive every branch of the request lifecycle deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use parking_lot::Mutex;
use tracing::debug;

use super::{ByteStream, SwarmEngine, SwarmError, SwarmFile, SwarmSession};

/// Chunk size for simulated range reads, small enough to exercise streaming.
const SIM_CHUNK_SIZE: usize = 16 * 1024;

/// How a simulated session answers [`SwarmSession::ready`].
#[derive(Debug, Clone, Copy)]
pub enum Readiness {
    /// Resolve immediately.
    Immediate,
    /// Resolve after a fixed delay.
    Delayed(Duration),
    /// Never resolve, like a swarm with no reachable peers.
    Never,
}

/// An in-memory file the simulated swarm will discover.
#[derive(Debug, Clone)]
pub struct SimFile {
    name: String,
    content: Bytes,
}

impl SimFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A file of `length` deterministic bytes, handy for asserting on
    /// served ranges.
    pub fn patterned(name: impl Into<String>, length: usize) -> Self {
        let content: Vec<u8> = (0..length).map(|i| (i % 251) as u8).collect();
        Self::new(name, content)
    }
}

/// Simulated swarm engine handing out [`SimSwarmSession`]s.
pub struct SimSwarmEngine {
    files: Vec<SimFile>,
    readiness: Readiness,
    fail_open: bool,
    sessions: Mutex<Vec<Arc<SimSwarmSession>>>,
}

impl SimSwarmEngine {
    pub fn new(files: Vec<SimFile>) -> Self {
        Self {
            files,
            readiness: Readiness::Immediate,
            fail_open: false,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the readiness behavior for every opened session.
    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    /// An engine whose `open` fails, for exercising the 500 path.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(Vec::new())
        }
    }

    /// Engine for local development: one synthetic movie, short discovery.
    pub fn demo() -> Self {
        Self::new(vec![SimFile::patterned("demo.mp4", 4 * 1024 * 1024)])
            .with_readiness(Readiness::Delayed(Duration::from_millis(300)))
    }

    /// All sessions this engine has opened, in open order.
    pub fn sessions(&self) -> Vec<Arc<SimSwarmSession>> {
        self.sessions.lock().clone()
    }
}

impl SwarmEngine for SimSwarmEngine {
    fn open(&self, magnet: &str) -> Result<Arc<dyn SwarmSession>, SwarmError> {
        if self.fail_open {
            return Err(SwarmError::OpenFailed {
                reason: format!("no route to swarm for {magnet}"),
            });
        }
        debug!(magnet, "opening simulated swarm session");
        let session = Arc::new(SimSwarmSession {
            files: self.files.clone(),
            readiness: self.readiness,
            destroys: AtomicUsize::new(0),
        });
        self.sessions.lock().push(Arc::clone(&session));
        Ok(session)
    }
}

/// Session over the engine's scripted file set.
pub struct SimSwarmSession {
    files: Vec<SimFile>,
    readiness: Readiness,
    destroys: AtomicUsize,
}

impl SimSwarmSession {
    /// How many times `destroy` ran against this session.
    ///
    /// The guarded lifecycle must keep this at exactly one per request.
    pub fn destroy_count(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SwarmSession for SimSwarmSession {
    async fn ready(&self) {
        match self.readiness {
            Readiness::Immediate => {}
            Readiness::Delayed(wait) => tokio::time::sleep(wait).await,
            Readiness::Never => std::future::pending::<()>().await,
        }
    }

    fn files(&self) -> Vec<SwarmFile> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| SwarmFile {
                index,
                name: file.name.clone(),
                length: file.content.len() as u64,
            })
            .collect()
    }

    fn stream_range(&self, file_index: usize, start: u64, end: u64) -> ByteStream {
        let Some(file) = self.files.get(file_index) else {
            return Box::pin(stream::empty());
        };
        let len = file.content.len();
        let from = (start as usize).min(len);
        let to = (end as usize).saturating_add(1).min(len);
        let slice = file.content.slice(from..to);

        let chunks: Vec<std::io::Result<Bytes>> = (0..slice.len())
            .step_by(SIM_CHUNK_SIZE)
            .map(|offset| {
                let stop = (offset + SIM_CHUNK_SIZE).min(slice.len());
                Ok(slice.slice(offset..stop))
            })
            .collect();
        Box::pin(stream::iter(chunks))
    }

    async fn destroy(&self) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

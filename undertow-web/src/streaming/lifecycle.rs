//! Request lifecycle state for a single streaming request.

use std::sync::Arc;

use tracing::debug;
use undertow_core::swarm::{SessionGuard, SwarmSession};

/// States of one streaming request.
///
/// `Pending` until the swarm signals readiness, `Streaming` while the
/// response is being produced, `TimedOut` when discovery lost the race.
/// Every request ends `Closed`; a client disconnect skips straight there
/// by dropping the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterState {
    Pending,
    Streaming,
    TimedOut,
    Closed,
}

/// Owns the swarm session for the duration of one request.
///
/// The lifecycle is held by the handler until a response body exists, then
/// moves into the body stream so it lives exactly as long as the transfer.
/// All state transitions happen on the single request task; the only
/// cross-task race (teardown from a dropped body versus an explicit
/// teardown) is resolved atomically inside [`SessionGuard`].
pub struct Lifecycle {
    guard: SessionGuard,
    state: ArbiterState,
}

impl Lifecycle {
    pub fn new(session: Arc<dyn SwarmSession>) -> Self {
        Self {
            guard: SessionGuard::new(session),
            state: ArbiterState::Pending,
        }
    }

    pub fn session(&self) -> &dyn SwarmSession {
        self.guard.session()
    }

    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// Readiness won the race: Pending → Streaming.
    pub fn observe_ready(&mut self) {
        debug_assert_eq!(self.state, ArbiterState::Pending);
        self.guard.mark_ready();
        self.state = ArbiterState::Streaming;
        debug!("swarm session ready, streaming response");
    }

    /// The timeout won the race: Pending → TimedOut.
    pub fn observe_timeout(&mut self) {
        debug_assert_eq!(self.state, ArbiterState::Pending);
        self.state = ArbiterState::TimedOut;
    }

    /// Closes the request and destroys the session exactly once.
    ///
    /// Used on every terminal path that does not stream a body (no playable
    /// file, unsatisfiable range, timeout). Streamed bodies instead carry
    /// the lifecycle and tear down on drop.
    pub async fn teardown(mut self) {
        self.state = ArbiterState::Closed;
        self.guard.destroy().await;
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        // Reached directly when the body finishes or the client disconnects;
        // the guard's own drop schedules the engine destroy if still needed.
        if self.state != ArbiterState::Closed {
            debug!(state = ?self.state, "request lifecycle closed");
            self.state = ArbiterState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use undertow_core::swarm::{SimFile, SimSwarmEngine, SwarmEngine};

    use super::*;

    fn lifecycle(engine: &SimSwarmEngine) -> Lifecycle {
        Lifecycle::new(engine.open("magnet:?xt=urn:btih:aa").unwrap())
    }

    #[tokio::test]
    async fn test_ready_transition() {
        let engine = SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 10)]);
        let mut lifecycle = lifecycle(&engine);

        assert_eq!(lifecycle.state(), ArbiterState::Pending);
        lifecycle.observe_ready();
        assert_eq!(lifecycle.state(), ArbiterState::Streaming);
    }

    #[tokio::test]
    async fn test_teardown_destroys_once() {
        let engine = SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 10)]);
        let mut lifecycle = lifecycle(&engine);

        lifecycle.observe_timeout();
        lifecycle.teardown().await;

        assert_eq!(engine.sessions()[0].destroy_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_destroys_session() {
        let engine = SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 10)]);
        {
            let mut lifecycle = lifecycle(&engine);
            lifecycle.observe_ready();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(engine.sessions()[0].destroy_count(), 1);
    }
}

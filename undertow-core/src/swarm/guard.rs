//! Exactly-once teardown for swarm sessions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::warn;

use super::{SessionState, SwarmSession};

/// Owns a swarm session and guarantees its destroy runs exactly once.
///
/// The engine's destroy operation is not idempotent, while teardown can be
/// triggered from several places: the request handler after an error
/// response, the body stream finishing, or the client disconnecting
/// mid-transfer. The guard collapses all of those into a single underlying
/// engine call via an atomic state swap. Dropping the guard without an
/// explicit [`destroy`](SessionGuard::destroy) schedules the engine call on
/// the current runtime, which covers the disconnect path where nobody is
/// left to await it.
pub struct SessionGuard {
    session: Arc<dyn SwarmSession>,
    state: AtomicU8,
}

impl SessionGuard {
    pub fn new(session: Arc<dyn SwarmSession>) -> Self {
        Self {
            session,
            state: AtomicU8::new(SessionState::Initializing.as_u8()),
        }
    }

    /// Access to the guarded session for readiness, file listing and reads.
    pub fn session(&self) -> &dyn SwarmSession {
        self.session.as_ref()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Records the engine's readiness signal.
    ///
    /// Initializing → Ready. A session already destroyed by a racing
    /// trigger stays destroyed.
    pub fn mark_ready(&self) {
        let _ = self.state.compare_exchange(
            SessionState::Initializing.as_u8(),
            SessionState::Ready.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Destroys the underlying session unless a previous trigger already did.
    ///
    /// Safe to call any number of times; the engine sees one call.
    pub async fn destroy(&self) {
        if self.swap_destroyed() {
            self.session.destroy().await;
        }
    }

    /// Flips the state to Destroyed, returning true for the winning caller.
    fn swap_destroyed(&self) -> bool {
        self.state
            .swap(SessionState::Destroyed.as_u8(), Ordering::AcqRel)
            != SessionState::Destroyed.as_u8()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.swap_destroyed() {
            return;
        }
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { session.destroy().await });
            }
            Err(_) => warn!("no async runtime at teardown, swarm session leaked"),
        }
    }
}

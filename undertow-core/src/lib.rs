//! Undertow Core - Swarm streaming building blocks
//!
//! This crate provides the fundamental pieces for magnet-URI media streaming:
//! the peer-swarm engine contract, exactly-once session teardown, playable
//! file selection, and configuration management.

pub mod config;
pub mod media;
pub mod swarm;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::UndertowConfig;
pub use media::{MediaError, MediaKind, SelectedMedia};
pub use swarm::{SessionGuard, SessionState, SwarmEngine, SwarmError, SwarmFile, SwarmSession};

/// Core errors that can bubble up from any Undertow subsystem.
#[derive(Debug, thiserror::Error)]
pub enum UndertowError {
    #[error("Swarm error: {0}")]
    Swarm(#[from] SwarmError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UndertowError>;

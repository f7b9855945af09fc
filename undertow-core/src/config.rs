//! Centralized configuration for Undertow.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::net::SocketAddr;
use std::time::Duration;

/// Central configuration for all Undertow components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct UndertowConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the streaming server binds to
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Streaming request lifecycle configuration.
///
/// Controls how long a request waits for swarm discovery before giving up.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// How long to wait for the swarm engine to signal readiness before
    /// answering 408. A zero duration disables the timeout entirely.
    pub readiness_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            readiness_timeout: Duration::from_millis(10_000),
        }
    }
}

impl StreamConfig {
    /// Returns true when the readiness timeout is disabled.
    pub fn timeout_disabled(&self) -> bool {
        self.readiness_timeout.is_zero()
    }
}

impl UndertowConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("UNDERTOW_STREAM_TIMEOUT_MS") {
            if let Ok(millis) = timeout.parse::<u64>() {
                config.stream.readiness_timeout = Duration::from_millis(millis);
            }
        }

        if let Ok(address) = std::env::var("UNDERTOW_BIND_ADDRESS") {
            if let Ok(parsed) = address.parse::<SocketAddr>() {
                config.server.bind_address = parsed;
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Uses a short readiness timeout so timeout-path tests complete quickly.
    pub fn for_testing() -> Self {
        Self {
            stream: StreamConfig {
                readiness_timeout: Duration::from_millis(200),
            },
            ..Default::default()
        }
    }
}

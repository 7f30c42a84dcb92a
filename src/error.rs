//! Error taxonomy for server construction and lifecycle.
//!
//! Per-request failures (resolution misses, filesystem read errors) never
//! surface here; they are answered with 404/500 responses inside the handler
//! and cannot take down the serving loop.

use thiserror::Error;

/// Fatal construction and lifecycle errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration: bad port, empty route table,
    /// unreadable config file.
    #[error("configuration error: {0}")]
    Config(String),

    /// The listening socket could not be bound (port in use, no permission).
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// `start()` was called while the serving loop is already running.
    #[error("server is already running")]
    AlreadyRunning,

    /// `stop()` was called on a server that is not running.
    #[error("server is not running")]
    NotRunning,
}

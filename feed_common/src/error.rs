//! Error types shared between client and server.
//!
//! The `FeedError` enum unifies the failure cases of the feed: socket I/O,
//! WebSocket protocol errors, JSON encoding, channel hand-off, poisoned locks and
//! invalid configuration. Both binaries propagate it with `?`.
use std::io;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum FeedError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket protocol or transport error reported by `tungstenite`.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The WebSocket opening handshake did not complete.
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}

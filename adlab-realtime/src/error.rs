//! Error types for realtime sessions.

use thiserror::Error;

/// Errors produced by a live session.
#[derive(Debug, Error)]
pub enum LiveError {
    /// Failed to reach or keep the realtime endpoint.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The server sent something we could not interpret.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Microphone access was refused.
    #[error("Microphone permission denied: {message}")]
    PermissionDenied { message: String },

    /// Audio capture or playback failed.
    #[error("Audio error: {message}")]
    Audio { message: String },

    /// Wire serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session is closed and cannot accept further work.
    #[error("Session closed")]
    Closed,
}

impl LiveError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol { message: message.into() }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied { message: message.into() }
    }

    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio { message: message.into() }
    }
}

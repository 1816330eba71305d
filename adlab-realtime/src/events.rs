//! Session-level events delivered by a live channel.

use bytes::Bytes;

/// Content carried by a server turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Incremental transcription of the assistant's speech.
    OutputTranscript(String),
    /// Incremental transcription of the user's speech.
    InputTranscript(String),
    /// A chunk of 24 kHz PCM16 audio to play.
    Audio(Bytes),
    /// The user started talking over the assistant; pending playback must
    /// be flushed.
    Interrupted,
    /// The assistant finished its turn.
    TurnComplete,
}

/// Lifecycle and content events for a session, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The channel finished its setup handshake.
    Opened,
    /// A content message from the server.
    Message(ServerMessage),
    /// The channel failed. Terminal: teardown follows.
    Error(String),
    /// The channel closed. Terminal: teardown follows.
    Closed,
}

impl SessionEvent {
    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::Error(_) | SessionEvent::Closed)
    }
}

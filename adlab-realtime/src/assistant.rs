//! The live assistant state machine.
//!
//! [`LiveAssistant`] is pure bookkeeping: it consumes [`SessionEvent`]s and
//! returns [`AudioCommand`]s for the audio output to carry out. Keeping it
//! free of I/O makes every lifecycle rule directly testable with scripted
//! events.

use crate::audio::{AudioChunk, AudioFormat};
use crate::events::{ServerMessage, SessionEvent};
use crate::playback::{OutputClock, PlaybackScheduler, SourceId};
use crate::transcript::{Speaker, TranscriptLog};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected; nothing captured, nothing playing.
    Idle,
    /// Connection attempt underway.
    Connecting,
    /// Setup acknowledged; audio flows both ways.
    Active,
    /// Torn down. Terminal.
    Closed,
}

/// An instruction for the audio output.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Start playing a chunk at the given clock time.
    Play { source: SourceId, start: f64, chunk: AudioChunk },
    /// Stop the given sources immediately.
    Stop { sources: Vec<SourceId> },
    /// The session ended; release capture and output resources.
    ReleaseAll,
}

/// Session state machine: transcript, playback schedule, lifecycle.
pub struct LiveAssistant<C: OutputClock> {
    state: SessionState,
    clock: C,
    scheduler: PlaybackScheduler,
    transcript: TranscriptLog,
}

impl<C: OutputClock> LiveAssistant<C> {
    pub fn new(clock: C) -> Self {
        Self {
            state: SessionState::Idle,
            clock,
            scheduler: PlaybackScheduler::new(),
            transcript: TranscriptLog::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    /// Mark the connection attempt as started.
    pub fn begin_connect(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Connecting;
        }
    }

    /// The connection attempt failed before the session opened.
    pub fn abort_connect(&mut self) {
        if self.state == SessionState::Connecting {
            self.state = SessionState::Idle;
        }
    }

    /// A playback source finished on its own.
    pub fn source_ended(&mut self, id: SourceId) {
        self.scheduler.source_ended(id);
    }

    /// Consume a session event and return the audio commands it implies.
    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<AudioCommand> {
        if self.state == SessionState::Closed {
            return Vec::new();
        }
        match event {
            SessionEvent::Opened => {
                self.state = SessionState::Active;
                Vec::new()
            }
            SessionEvent::Message(message) => self.handle_message(message),
            SessionEvent::Error(reason) => {
                tracing::warn!(%reason, "live session error, tearing down");
                self.shutdown()
            }
            SessionEvent::Closed => self.shutdown(),
        }
    }

    fn handle_message(&mut self, message: ServerMessage) -> Vec<AudioCommand> {
        match message {
            ServerMessage::Audio(bytes) => {
                let chunk = AudioChunk::new(bytes.to_vec(), AudioFormat::pcm16_24khz());
                let now = self.clock.now();
                let (source, start) = self.scheduler.schedule(chunk.duration_secs(), now);
                vec![AudioCommand::Play { source, start, chunk }]
            }
            ServerMessage::OutputTranscript(fragment) => {
                self.transcript.push_fragment(Speaker::Assistant, &fragment);
                Vec::new()
            }
            ServerMessage::InputTranscript(fragment) => {
                self.transcript.push_fragment(Speaker::User, &fragment);
                Vec::new()
            }
            ServerMessage::Interrupted => {
                let sources = self.scheduler.interrupt();
                if sources.is_empty() {
                    Vec::new()
                } else {
                    vec![AudioCommand::Stop { sources }]
                }
            }
            ServerMessage::TurnComplete => Vec::new(),
        }
    }

    /// Tear the session down. Idempotent: a second call returns nothing.
    pub fn shutdown(&mut self) -> Vec<AudioCommand> {
        if self.state == SessionState::Closed {
            return Vec::new();
        }
        self.state = SessionState::Closed;
        self.transcript.clear();
        let sources = self.scheduler.interrupt();
        let mut commands = Vec::new();
        if !sources.is_empty() {
            commands.push(AudioCommand::Stop { sources });
        }
        commands.push(AudioCommand::ReleaseAll);
        commands
    }
}

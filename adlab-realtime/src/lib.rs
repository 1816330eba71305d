//! Realtime voice sessions for AdLab.
//!
//! A session streams microphone audio up to a live model and plays the
//! model's spoken reply back with no gaps, while keeping a short rolling
//! transcript of both sides. The moving parts:
//!
//! - [`LiveAssistant`]: the session state machine. Consumes
//!   [`SessionEvent`]s, emits [`AudioCommand`]s, owns the transcript and
//!   the playback schedule.
//! - [`LiveSession`]: the async driver that pumps microphone frames up and
//!   server events down until stopped or the server closes.
//! - [`GeminiLiveChannel`]: the WebSocket transport behind the
//!   [`LiveConnector`] trait.
//!
//! Capture is 16 kHz mono PCM16, playback is 24 kHz mono PCM16.

pub mod assistant;
pub mod audio;
pub mod config;
pub mod error;
pub mod events;
pub mod playback;
pub mod session;
pub mod transcript;
pub mod transport;

pub use assistant::{AudioCommand, LiveAssistant, SessionState};
pub use audio::{AudioChunk, AudioFormat};
pub use config::LiveConfig;
pub use error::LiveError;
pub use events::{ServerMessage, SessionEvent};
pub use playback::{MonotonicClock, OutputClock, PlaybackScheduler, SourceId};
pub use session::{
    AudioOutput, LiveChannel, LiveConnector, LiveSession, MicSource, StopHandle,
};
pub use transcript::{Speaker, TranscriptLine, TranscriptLog};
pub use transport::{GeminiLiveConnector, LIVE_AUDIO_MIME};

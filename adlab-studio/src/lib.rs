//! The AdLab production console core.
//!
//! Everything a campaign workspace needs behind its UI: structured ad copy
//! and branding guidance, image generation and editing, long-running video
//! render jobs with narrated progress, search-grounded chat, and the
//! configuration for the live voice assistant.
//!
//! Credentials flow through [`KeySource`] so a key selected mid-session is
//! picked up by the next API call, and [`KeyChooser`] models the one
//! re-prompt a job gets when the provider rejects its key.

pub mod blob;
pub mod content;
pub mod error;
pub mod job;
pub mod keys;
pub mod live;
pub mod media;
pub mod ops;
pub mod poller;

pub use blob::{BlobStore, MediaBlob};
pub use content::{AdStudio, AdSuggestion, BrandKit, ChatReply, GroundingLink, Platform};
pub use error::StudioError;
pub use job::{AspectRatio, GenerationJob, JobStatus, ReferenceImage, VideoBrief};
pub use keys::{EnvKey, KeyChooser, KeySource, NoChooser, StaticKey};
pub use live::{LIVE_ASSISTANT_PREAMBLE, live_assistant_config};
pub use media::DataUri;
pub use ops::GeminiVideoOps;
pub use poller::{OperationHandle, PollPolicy, VideoLab, VideoOps};

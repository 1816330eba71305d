//! Video generation jobs and their lifecycle.

use serde::{Deserialize, Serialize};

/// Output aspect ratio for a video render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9, landscape placements.
    Wide,
    /// 9:16, vertical placements.
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wide => "16:9",
            Self::Tall => "9:16",
        }
    }
}

/// A still image conditioning the render.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// What to render.
#[derive(Debug, Clone)]
pub struct VideoBrief {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub reference_image: Option<ReferenceImage>,
}

impl VideoBrief {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), aspect_ratio: AspectRatio::Wide, reference_image: None }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_reference_image(mut self, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.reference_image = Some(ReferenceImage { bytes, mime_type: mime_type.into() });
        self
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted, not yet submitted upstream.
    Submitted,
    /// Waiting on the long-running operation.
    Polling,
    /// Finished with a playable result.
    Completed,
    /// Finished without one. Terminal, never retried automatically.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One video render job as the console sees it.
///
/// `result_uri` is set exactly when the status is [`JobStatus::Completed`],
/// and is always an opaque `blob:` locator, never a provider URL.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub brief: VideoBrief,
    pub status: JobStatus,
    /// Human-readable progress line for the console.
    pub status_message: String,
    pub result_uri: Option<String>,
    pub error: Option<String>,
}

impl GenerationJob {
    pub(crate) fn new(brief: VideoBrief, status_message: impl Into<String>) -> Self {
        Self {
            brief,
            status: JobStatus::Submitted,
            status_message: status_message.into(),
            result_uri: None,
            error: None,
        }
    }

    pub(crate) fn set_status(&mut self, status: JobStatus, message: impl Into<String>) {
        self.status = status;
        self.status_message = message.into();
    }

    pub(crate) fn complete(&mut self, result_uri: String, message: impl Into<String>) {
        self.status = JobStatus::Completed;
        self.status_message = message.into();
        self.result_uri = Some(result_uri);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>, message: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.status_message = message.into();
        self.result_uri = None;
        self.error = Some(error.into());
    }
}

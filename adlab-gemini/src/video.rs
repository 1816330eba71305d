//! Long-running video generation: the `predictLongRunning` request builder
//! and the operation handle polled until the render finishes.

use crate::client::GeminiClient;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A still image conditioning the video render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoInstance {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ReferenceImage>,
}

/// Render parameters for a video generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationConfig {
    pub aspect_ratio: String,
    pub resolution: String,
    pub sample_count: u32,
}

impl Default for VideoGenerationConfig {
    fn default() -> Self {
        Self { aspect_ratio: "16:9".into(), resolution: "720p".into(), sample_count: 1 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoGenerationRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoGenerationConfig,
}

/// A finished video sample.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVideo {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedSample {
    video: Option<GeneratedVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: GenerateVideoResponse,
}

/// Terminal failure reported by a long-running operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    pub code: Option<i32>,
    pub message: Option<String>,
}

/// A long-running video generation operation.
///
/// `name` re-fetches the operation; `done` stays false until the render
/// either produces a sample or reports an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    response: Option<OperationResponse>,
    pub error: Option<OperationError>,
}

impl VideoOperation {
    /// The locator of the first finished sample, if the operation completed
    /// with output.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
    }
}

/// Builder for a `predictLongRunning` video generation request.
pub struct VideoBuilder {
    client: Arc<GeminiClient>,
    prompt: String,
    image: Option<ReferenceImage>,
    parameters: VideoGenerationConfig,
}

impl VideoBuilder {
    pub(crate) fn new(client: Arc<GeminiClient>) -> Self {
        Self {
            client,
            prompt: String::new(),
            image: None,
            parameters: VideoGenerationConfig::default(),
        }
    }

    /// Set the render prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Condition the render on a still image.
    pub fn with_reference_image(
        mut self,
        mime_type: impl Into<String>,
        bytes_base64: impl Into<String>,
    ) -> Self {
        self.image = Some(ReferenceImage {
            bytes_base64_encoded: bytes_base64.into(),
            mime_type: mime_type.into(),
        });
        self
    }

    /// Set the output aspect ratio, e.g. `16:9` or `9:16`.
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.parameters.aspect_ratio = aspect_ratio.into();
        self
    }

    /// Set the output resolution, e.g. `720p`.
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.parameters.resolution = resolution.into();
        self
    }

    /// Submit the render. The returned operation must be polled to
    /// completion with [`crate::Gemini::get_video_operation`].
    #[tracing::instrument(skip_all, fields(model = %self.client.model))]
    pub async fn execute(self) -> Result<VideoOperation, Error> {
        let url = self.client.build_url("predictLongRunning")?;
        let request = VideoGenerationRequest {
            instances: vec![VideoInstance { prompt: self.prompt, image: self.image }],
            parameters: self.parameters,
        };
        self.client.post_json(url, &request).await
    }
}

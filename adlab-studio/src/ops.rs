//! Provider-backed video operations.

use crate::error::StudioError;
use crate::keys::KeySource;
use crate::poller::{OperationHandle, VideoOps};
use adlab_gemini::{Gemini, Model, VideoOperation};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// [`VideoOps`] over the real API.
///
/// A client is built per call from the current key, so a credential picked
/// in the chooser mid-session is used on the very next request.
pub struct GeminiVideoOps<S> {
    keys: S,
    model: Model,
}

impl<S: KeySource> GeminiVideoOps<S> {
    pub fn new(keys: S) -> Self {
        Self { keys, model: Model::Veo31FastGeneratePreview }
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    fn client(&self) -> Result<Gemini, StudioError> {
        let credential = self
            .keys
            .current()
            .ok_or_else(|| StudioError::credential("no API key available"))?;
        Ok(Gemini::with_model(credential, self.model.clone())?)
    }
}

/// House style applied to every render prompt before submission.
fn cinematic_prompt(prompt: &str) -> String {
    format!(
        "Cinematic professional commercial video for a brand: {prompt}. \
         High production value, smooth transitions, sharp focus."
    )
}

fn to_handle(op: VideoOperation) -> OperationHandle {
    OperationHandle {
        result_uri: op.video_uri().map(str::to_string),
        done: op.done,
        error: op.error.and_then(|e| e.message),
        name: op.name,
    }
}

#[async_trait]
impl<S: KeySource> VideoOps for GeminiVideoOps<S> {
    async fn submit(
        &self,
        brief: &crate::job::VideoBrief,
    ) -> Result<OperationHandle, StudioError> {
        let mut builder = self
            .client()?
            .generate_video()
            .with_prompt(cinematic_prompt(&brief.prompt))
            .with_aspect_ratio(brief.aspect_ratio.as_str());
        if let Some(image) = &brief.reference_image {
            builder =
                builder.with_reference_image(&image.mime_type, BASE64.encode(&image.bytes));
        }
        Ok(to_handle(builder.execute().await?))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationHandle, StudioError> {
        Ok(to_handle(self.client()?.get_video_operation(&handle.name).await?))
    }

    async fn fetch_result(&self, locator: &str) -> Result<Vec<u8>, StudioError> {
        Ok(self.client()?.download(locator).await?)
    }
}

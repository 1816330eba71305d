//! Request and response types for `generateContent`, plus the builder that
//! assembles a request incrementally and executes it.

use crate::client::GeminiClient;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Raw media bytes carried inline in a request or response, base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), data: data.into() }
    }
}

/// A single part of a content entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob,
    },
}

/// A content entry: an ordered list of parts attributed to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self { role: Some(Role::User), parts: vec![Part::Text { text: text.into() }] }
    }

    /// A system instruction carries no role.
    pub fn system_text(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part::Text { text: text.into() }] }
    }
}

/// Output image shaping options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Thinking budget controls for reasoning-capable models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

/// Generation tuning options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// A tool the model may invoke while generating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<serde_json::Value>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self { google_search: Some(serde_json::json!({})) }
    }
}

/// Request body for `generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// A web source the model grounded an answer in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebGroundingChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// One grounding source attached to a candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    pub web: Option<WebGroundingChunk>,
}

/// Grounding attribution for a candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Response body for `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerationResponse {
    /// Concatenated text of every text part in the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// The first inline media part of the first candidate, if any.
    pub fn first_inline_data(&self) -> Option<&Blob> {
        self.candidates.first().and_then(|c| c.content.as_ref()).and_then(|content| {
            content.parts.iter().find_map(|part| match part {
                Part::InlineData { inline_data } => Some(inline_data),
                _ => None,
            })
        })
    }

    /// Grounding sources of the first candidate with a usable web reference.
    pub fn web_grounding(&self) -> Vec<&WebGroundingChunk> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|g| g.grounding_chunks.iter().filter_map(|chunk| chunk.web.as_ref()).collect())
            .unwrap_or_default()
    }
}

/// Builder for a `generateContent` request.
pub struct ContentBuilder {
    client: Arc<GeminiClient>,
    request: GenerateContentRequest,
}

impl ContentBuilder {
    pub(crate) fn new(client: Arc<GeminiClient>) -> Self {
        Self {
            client,
            request: GenerateContentRequest {
                contents: Vec::new(),
                system_instruction: None,
                generation_config: None,
                tools: None,
            },
        }
    }

    /// Append a user text turn.
    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.request.contents.push(Content::user_text(text));
        self
    }

    /// Append inline media to the most recent user turn, creating one if
    /// the conversation is empty.
    pub fn with_inline_data(
        mut self,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        let part = Part::InlineData { inline_data: Blob::new(mime_type, data) };
        match self.request.contents.last_mut() {
            Some(content) => content.parts.push(part),
            None => self
                .request
                .contents
                .push(Content { role: Some(Role::User), parts: vec![part] }),
        }
        self
    }

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.request.system_instruction = Some(Content::system_text(text));
        self
    }

    fn generation_config(&mut self) -> &mut GenerationConfig {
        self.request.generation_config.get_or_insert_with(GenerationConfig::default)
    }

    /// Set the response MIME type, e.g. `application/json`.
    pub fn with_response_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.generation_config().response_mime_type = Some(mime_type.into());
        self
    }

    /// Constrain the response to the given JSON schema.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.generation_config().response_schema = Some(schema);
        self
    }

    /// Set the output image aspect ratio, e.g. `1:1`.
    pub fn with_image_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        let config = self.generation_config();
        config.image_config.get_or_insert_with(ImageConfig::default).aspect_ratio =
            Some(aspect_ratio.into());
        self
    }

    /// Set the thinking budget. `-1` lets the model decide.
    pub fn with_thinking_budget(mut self, thinking_budget: i32) -> Self {
        self.generation_config().thinking_config = Some(ThinkingConfig { thinking_budget });
        self
    }

    /// Enable Google Search grounding.
    pub fn with_google_search(mut self) -> Self {
        self.request.tools.get_or_insert_with(Vec::new).push(Tool::google_search());
        self
    }

    /// Execute the request.
    #[tracing::instrument(skip_all, fields(model = %self.client.model))]
    pub async fn execute(self) -> Result<GenerationResponse, Error> {
        let url = self.client.build_url("generateContent")?;
        self.client.post_json(url, &self.request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_in_wire_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("hello")],
            system_instruction: Some(Content::system_text("be brief")),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(json!({"type": "OBJECT"})),
                image_config: None,
                thinking_config: None,
            }),
            tools: Some(vec![Tool::google_search()]),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["tools"][0]["googleSearch"], json!({}));
    }

    #[test]
    fn inline_data_joins_the_latest_turn() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("describe this")],
            system_instruction: None,
            generation_config: None,
            tools: None,
        };
        let mut content = request.contents;
        content[0].parts.push(Part::InlineData { inline_data: Blob::new("image/png", "QUJD") });

        let value = serde_json::to_value(&content[0]).unwrap();
        assert_eq!(value["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(value["parts"][1]["inlineData"]["data"], "QUJD");
    }

    #[test]
    fn response_text_concatenates_text_parts() {
        let response: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Hello"},
                        {"inlineData": {"mimeType": "image/png", "data": "QUJD"}},
                        {"text": ", world"}
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(response.text(), "Hello, world");
        assert_eq!(response.first_inline_data().unwrap().mime_type, "image/png");
    }

    #[test]
    fn grounding_chunks_without_web_are_skipped() {
        let response: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "grounded"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com", "title": "Example"}},
                        {}
                    ]
                }
            }]
        }))
        .unwrap();

        let web = response.web_grounding();
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].uri.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn empty_response_yields_empty_text() {
        let response = GenerationResponse::default();
        assert_eq!(response.text(), "");
        assert!(response.first_inline_data().is_none());
        assert!(response.web_grounding().is_empty());
    }
}

//! Wire-shape tests for the JSON bodies sent to and received from the API.

use adlab_gemini::{
    Content, GenerateContentRequest, GenerationConfig, GenerationResponse, ImageConfig, Tool,
    VideoOperation,
};
use serde_json::json;

#[test]
fn full_content_request_matches_wire_shape() {
    let request = GenerateContentRequest {
        contents: vec![Content::user_text("Write a tagline")],
        system_instruction: Some(Content::system_text("You are a copywriter")),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(json!({
                "type": "OBJECT",
                "properties": {"headline": {"type": "STRING"}},
                "required": ["headline"]
            })),
            image_config: Some(ImageConfig { aspect_ratio: Some("1:1".into()) }),
            thinking_config: None,
        }),
        tools: Some(vec![Tool::google_search()]),
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "contents": [
                {"role": "user", "parts": [{"text": "Write a tagline"}]}
            ],
            "systemInstruction": {"parts": [{"text": "You are a copywriter"}]},
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {"headline": {"type": "STRING"}},
                    "required": ["headline"]
                },
                "imageConfig": {"aspectRatio": "1:1"}
            },
            "tools": [{"googleSearch": {}}]
        })
    );
}

#[test]
fn minimal_request_omits_optional_fields() {
    let request = GenerateContentRequest {
        contents: vec![Content::user_text("hi")],
        system_instruction: None,
        generation_config: None,
        tools: None,
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
    );
}

#[test]
fn image_response_parses_inline_data() {
    let response: GenerationResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}]
            }
        }]
    }))
    .unwrap();

    let blob = response.first_inline_data().unwrap();
    assert_eq!(blob.mime_type, "image/png");
    assert_eq!(blob.data, "aGVsbG8=");
}

#[test]
fn operation_roundtrip_from_poll_response() {
    let op: VideoOperation = serde_json::from_value(json!({
        "name": "models/veo-3.1-fast-generate-preview/operations/xyz",
        "done": true,
        "response": {
            "generateVideoResponse": {
                "generatedSamples": [{"video": {"uri": "https://example.com/v?alt=media"}}]
            }
        }
    }))
    .unwrap();

    assert_eq!(op.name, "models/veo-3.1-fast-generate-preview/operations/xyz");
    assert_eq!(op.video_uri(), Some("https://example.com/v?alt=media"));
}

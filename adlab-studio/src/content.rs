//! Ad copy, branding, imagery, and grounded chat.
//!
//! Each operation builds a fresh client from the current key, sends one
//! `generateContent` request shaped for the task, and folds the response
//! into a console type. Prompt assembly and response parsing are plain
//! functions so they test without a network.

use crate::error::StudioError;
use crate::keys::KeySource;
use crate::media::DataUri;
use adlab_gemini::{Gemini, Model};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Placement target for a piece of ad copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Tiktok,
    Linkedin,
    Website,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
            Self::Linkedin => "linkedin",
            Self::Website => "website",
        }
    }
}

/// Generated ad copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSuggestion {
    pub headline: String,
    pub caption: String,
    pub cta: String,
    pub color_palette: Vec<String>,
}

/// Brand font pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    pub primary: String,
    pub secondary: String,
}

/// A brand identity, generated or user-maintained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandKit {
    pub name: String,
    pub mission: String,
    pub values: Vec<String>,
    pub usp: String,
    pub colors: Vec<String>,
    pub fonts: FontPair,
    pub voice: String,
}

/// A web source behind a grounded chat answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingLink {
    pub uri: String,
    pub title: String,
}

/// A chat answer plus the sources it was grounded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub grounding: Vec<GroundingLink>,
}

/// Branding context folded into copy prompts.
fn brand_context(brand: Option<&BrandKit>) -> String {
    match brand {
        Some(brand) => format!(
            "Apply the following branding guidelines:\n\
             Brand Name: {}\n\
             Mission: {}\n\
             Core Values: {}\n\
             Voice & Tone: {}\n\
             Brand Colors: {}",
            brand.name,
            brand.mission,
            brand.values.join(", "),
            brand.voice,
            brand.colors.join(", "),
        ),
        None => "Use a professional commercial tone.".to_string(),
    }
}

fn ad_copy_prompt(
    prompt: &str,
    platform: Platform,
    image_description: Option<&str>,
    brand: Option<&BrandKit>,
) -> String {
    let image_context = image_description
        .map(|d| format!("The image contains: {d}. "))
        .unwrap_or_default();
    format!(
        "Generate professional ad content for {}. User context: {prompt}. {image_context}{}\n\
         Return suggestions for a high-converting ad including a headline, caption, CTA, \
         and a hex color palette that matches the brand identity.",
        platform.as_str(),
        brand_context(brand),
    )
}

fn ad_copy_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": {"type": "STRING"},
            "caption": {"type": "STRING"},
            "cta": {"type": "STRING"},
            "colorPalette": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["headline", "caption", "cta", "colorPalette"]
    })
}

fn branding_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {"type": "STRING"},
            "mission": {"type": "STRING"},
            "values": {"type": "ARRAY", "items": {"type": "STRING"}},
            "usp": {"type": "STRING"},
            "colors": {"type": "ARRAY", "items": {"type": "STRING"}},
            "fonts": {
                "type": "OBJECT",
                "properties": {
                    "primary": {"type": "STRING"},
                    "secondary": {"type": "STRING"}
                }
            },
            "voice": {"type": "STRING"}
        },
        "required": ["name", "mission", "values", "usp", "colors", "fonts", "voice"]
    })
}

/// Parse model output into a suggestion, or fall back to stock copy.
///
/// Copy generation should never brick the editor over a malformed answer,
/// so a parse failure yields a usable default seeded with the brand
/// palette when one exists.
fn parse_ad_suggestion(text: &str, brand: Option<&BrandKit>) -> AdSuggestion {
    match serde_json::from_str(text) {
        Ok(suggestion) => suggestion,
        Err(e) => {
            tracing::error!(error = %e, "unparseable ad copy response, using fallback");
            AdSuggestion {
                headline: "Revolutionize Your Business".to_string(),
                caption: "Discover the power of AI-driven marketing with our latest solutions."
                    .to_string(),
                cta: "Learn More".to_string(),
                color_palette: brand
                    .map(|b| b.colors.iter().take(3).cloned().collect())
                    .unwrap_or_else(|| {
                        vec!["#6366f1".to_string(), "#4f46e5".to_string(), "#ffffff".to_string()]
                    }),
            }
        }
    }
}

/// Content generation surface of the console.
pub struct AdStudio<S> {
    keys: S,
}

impl<S: KeySource> AdStudio<S> {
    pub fn new(keys: S) -> Self {
        Self { keys }
    }

    fn client(&self, model: Model) -> Result<Gemini, StudioError> {
        let credential = self
            .keys
            .current()
            .ok_or_else(|| StudioError::credential("no API key available"))?;
        Ok(Gemini::with_model(credential, model)?)
    }

    /// Generate ad copy for a placement. Falls back to stock copy when the
    /// model's answer does not parse; network and credential failures
    /// still surface as errors.
    #[tracing::instrument(skip_all, fields(platform = platform.as_str()))]
    pub async fn generate_ad_content(
        &self,
        prompt: &str,
        platform: Platform,
        image_description: Option<&str>,
        brand: Option<&BrandKit>,
    ) -> Result<AdSuggestion, StudioError> {
        let response = self
            .client(Model::Gemini3FlashPreview)?
            .generate_content()
            .with_user_message(ad_copy_prompt(prompt, platform, image_description, brand))
            .with_response_mime_type("application/json")
            .with_response_schema(ad_copy_schema())
            .execute()
            .await?;
        Ok(parse_ad_suggestion(&response.text(), brand))
    }

    /// Generate a full brand identity. No fallback here: a malformed
    /// answer is an error the caller sees.
    #[tracing::instrument(skip_all, fields(brand = brand_name))]
    pub async fn generate_branding(
        &self,
        brand_name: &str,
        business_type: &str,
    ) -> Result<BrandKit, StudioError> {
        let prompt = format!(
            "Create a comprehensive brand identity for a company named \"{brand_name}\" \
             which is a \"{business_type}\". Include mission, values (array), USP, a hex \
             color palette (array of 5), font suggestions (primary and secondary), and \
             brand voice description."
        );
        let response = self
            .client(Model::Gemini3FlashPreview)?
            .generate_content()
            .with_user_message(prompt)
            .with_response_mime_type("application/json")
            .with_response_schema(branding_schema())
            .execute()
            .await?;
        serde_json::from_str(&response.text())
            .map_err(|e| StudioError::malformed(format!("branding response: {e}")))
    }

    /// Generate a square ad visual. Returns a PNG data URI.
    #[tracing::instrument(skip_all)]
    pub async fn generate_ad_image(
        &self,
        prompt: &str,
        brand: Option<&BrandKit>,
    ) -> Result<DataUri, StudioError> {
        let brand_visual_context = brand
            .map(|b| {
                format!(
                    "Style it according to \"{}\" brand identity: {}. Use these brand colors: {}. ",
                    b.name,
                    b.mission,
                    b.colors.join(", "),
                )
            })
            .unwrap_or_default();
        let response = self
            .client(Model::Gemini25FlashImage)?
            .generate_content()
            .with_user_message(format!(
                "Create a high-quality commercial advertisement visual for: {prompt}. \
                 {brand_visual_context}Modern aesthetic, clean lighting, professional \
                 photography style."
            ))
            .with_image_aspect_ratio("1:1")
            .execute()
            .await?;
        let blob = response
            .first_inline_data()
            .ok_or_else(|| StudioError::malformed("image response carried no image part"))?;
        Ok(DataUri::new("image/png", blob.data.clone()))
    }

    /// Edit an existing visual with a text instruction. Takes and returns
    /// data URIs.
    #[tracing::instrument(skip_all)]
    pub async fn edit_ad_image(
        &self,
        image: &DataUri,
        edit_prompt: &str,
    ) -> Result<DataUri, StudioError> {
        let response = self
            .client(Model::Gemini25FlashImage)?
            .generate_content()
            .with_user_message(edit_prompt)
            .with_inline_data(image.mime_type.clone(), image.data.clone())
            .execute()
            .await?;
        let blob = response
            .first_inline_data()
            .ok_or_else(|| StudioError::malformed("edit response carried no image part"))?;
        Ok(DataUri::new("image/png", blob.data.clone()))
    }

    /// Answer a marketing question, optionally grounded in web search.
    #[tracing::instrument(skip_all, fields(grounded = use_search))]
    pub async fn chat(&self, message: &str, use_search: bool) -> Result<ChatReply, StudioError> {
        let mut builder = self
            .client(Model::Gemini3FlashPreview)?
            .generate_content()
            .with_user_message(message)
            .with_thinking_budget(-1);
        if use_search {
            builder = builder.with_google_search();
        }
        let response = builder.execute().await?;
        let grounding = response
            .web_grounding()
            .into_iter()
            .filter_map(|web| {
                Some(GroundingLink {
                    uri: web.uri.clone()?,
                    title: web.title.clone().unwrap_or_default(),
                })
            })
            .collect();
        Ok(ChatReply { text: response.text(), grounding })
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};

/// Models the ad-production console drives.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Model {
    /// Fast text model used for ad copy, branding guidelines and chat.
    #[default]
    #[serde(rename = "models/gemini-3-flash-preview")]
    Gemini3FlashPreview,
    /// Image-capable model used for ad visuals and image editing.
    #[serde(rename = "models/gemini-2.5-flash-image")]
    Gemini25FlashImage,
    /// Long-running video synthesis model.
    #[serde(rename = "models/veo-3.1-fast-generate-preview")]
    Veo31FastGeneratePreview,
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini3FlashPreview => "models/gemini-3-flash-preview",
            Model::Gemini25FlashImage => "models/gemini-2.5-flash-image",
            Model::Veo31FastGeneratePreview => "models/veo-3.1-fast-generate-preview",
            Model::Custom(model) => model,
        }
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Self::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Self::Custom(model.to_string())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

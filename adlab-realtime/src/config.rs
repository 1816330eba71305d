//! Session configuration.

/// Default live model.
pub const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-12-2025";

/// Configuration for a live session.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Model resource name.
    pub model: String,
    /// System instruction framing the assistant's persona.
    pub instruction: Option<String>,
    /// Response modalities, e.g. `AUDIO`.
    pub modalities: Vec<String>,
    /// Request transcription of the assistant's speech.
    pub output_transcription: bool,
    /// Request transcription of the user's speech.
    pub input_transcription: bool,
    /// Prebuilt voice name, if any.
    pub voice: Option<String>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LIVE_MODEL.to_string(),
            instruction: None,
            modalities: vec!["AUDIO".to_string()],
            output_transcription: true,
            input_transcription: true,
            voice: None,
        }
    }
}

impl LiveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_audio_with_both_transcriptions() {
        let config = LiveConfig::default();
        assert_eq!(config.model, DEFAULT_LIVE_MODEL);
        assert_eq!(config.modalities, vec!["AUDIO"]);
        assert!(config.output_transcription);
        assert!(config.input_transcription);
        assert!(config.instruction.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = LiveConfig::new()
            .with_model("models/custom-live")
            .with_instruction("Keep it brief")
            .with_voice("Puck");
        assert_eq!(config.model, "models/custom-live");
        assert_eq!(config.instruction.as_deref(), Some("Keep it brief"));
        assert_eq!(config.voice.as_deref(), Some("Puck"));
    }
}

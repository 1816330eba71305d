//! Live voice assistant configuration for the console.

use adlab_realtime::LiveConfig;

/// Persona instruction for the voice assistant.
pub const LIVE_ASSISTANT_PREAMBLE: &str =
    "You are a helpful advertising expert assistant. Keep responses conversational and brief.";

/// Session configuration for the console's voice assistant: the fixed
/// persona, audio both ways, transcripts of both sides.
pub fn live_assistant_config() -> LiveConfig {
    LiveConfig::new().with_instruction(LIVE_ASSISTANT_PREAMBLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_carries_persona_and_transcripts() {
        let config = live_assistant_config();
        assert_eq!(config.instruction.as_deref(), Some(LIVE_ASSISTANT_PREAMBLE));
        assert_eq!(config.modalities, vec!["AUDIO"]);
        assert!(config.output_transcription);
        assert!(config.input_transcription);
    }
}

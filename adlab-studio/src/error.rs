//! Console-level error classification.
//!
//! API failures fold into a handful of categories the UI layer can act on:
//! a credential problem prompts for a key, an entity-not-found triggers the
//! one-shot key re-prompt, everything else is surfaced as-is.

use thiserror::Error;

/// Errors surfaced by studio operations.
#[derive(Debug, Error)]
pub enum StudioError {
    /// No usable API key, or the provider refused the one we have.
    #[error("Credential error: {message}")]
    Credential { message: String },

    /// The provider reported the requested entity missing. For video jobs
    /// this usually means the key is not entitled to the model.
    #[error("Requested entity was not found")]
    EntityNotFound,

    /// Transport or provider failure.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The provider answered but not in the shape we expected.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl StudioError {
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential { message: message.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// Whether this failure should trigger the one-shot key re-prompt.
    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound)
    }
}

impl From<adlab_gemini::Error> for StudioError {
    fn from(err: adlab_gemini::Error) -> Self {
        if err.is_entity_not_found() {
            Self::EntityNotFound
        } else if err.is_unauthenticated() {
            Self::credential(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_classifies_as_credential() {
        let err: StudioError = adlab_gemini::Error::MissingApiKey.into();
        assert!(matches!(err, StudioError::Credential { .. }));
    }

    #[test]
    fn entity_not_found_flag() {
        assert!(StudioError::EntityNotFound.is_entity_not_found());
        assert!(!StudioError::network("timeout").is_entity_not_found());
    }
}

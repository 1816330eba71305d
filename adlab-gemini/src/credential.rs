//! Explicit API credential value.
//!
//! The credential is configuration handed to [`crate::GeminiBuilder`], never
//! read from the process environment inside the client. Re-selection is
//! modeled as constructing a new client from a new `Credential`.

use std::fmt;

/// An API key for the Gemini endpoints.
///
/// The wrapped key is redacted from `Debug` output so it cannot leak into
/// logs or error chains.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw API key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from the `GEMINI_API_KEY` environment variable.
    ///
    /// Convenience for binaries and tests; library code receives a
    /// `Credential` explicitly.
    pub fn from_env() -> Option<Self> {
        std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()).map(Self)
    }

    /// The raw key material.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the key is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

impl From<String> for Credential {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for Credential {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key_material() {
        let credential = Credential::new("super-secret-key");
        assert_eq!(format!("{credential:?}"), "Credential(..)");
    }

    #[test]
    fn expose_returns_raw_key() {
        let credential = Credential::new("abc123");
        assert_eq!(credential.expose(), "abc123");
        assert!(!credential.is_empty());
        assert!(Credential::new("").is_empty());
    }
}

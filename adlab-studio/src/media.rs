//! Data URI handling for generated imagery.

use crate::error::StudioError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// A `data:` URI wrapping base64 media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    /// Base64 payload, as carried in the URI.
    pub data: String,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), data: data.into() }
    }

    /// Wrap raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self { mime_type: mime_type.into(), data: BASE64.encode(bytes) }
    }

    /// Parse a `data:{mime};base64,{payload}` URI.
    pub fn parse(uri: &str) -> Result<Self, StudioError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::malformed(format!("not a data URI: {uri}")))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| StudioError::malformed("data URI is not base64 encoded"))?;
        Ok(Self { mime_type: mime_type.to_string(), data: data.to_string() })
    }

    /// Decode the payload.
    pub fn decode(&self) -> Result<Vec<u8>, StudioError> {
        BASE64
            .decode(&self.data)
            .map_err(|e| StudioError::malformed(format!("invalid base64 in data URI: {e}")))
    }

    /// Render as a `data:` URI string.
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_uri_form() {
        let original = DataUri::from_bytes("image/png", b"hello");
        let parsed = DataUri::parse(&original.to_uri()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.decode().unwrap(), b"hello");
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(DataUri::parse("https://example.com/a.png").is_err());
        assert!(DataUri::parse("data:image/png,rawtext").is_err());
    }
}

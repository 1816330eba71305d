use reqwest::header::InvalidHeaderValue;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("failed to parse API key"))]
    InvalidApiKey {
        source: InvalidHeaderValue,
    },

    #[snafu(display("api key is required for this configuration"))]
    MissingApiKey,

    #[snafu(display("failed to construct URL (probably incorrect model name): {suffix}"))]
    ConstructUrl {
        source: url::ParseError,
        suffix: String,
    },

    PerformRequestNew {
        source: reqwest::Error,
    },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// HTTP error description
        description: Option<String>,
    },

    #[snafu(display("failed to decode response body"))]
    DecodeResponse {
        source: reqwest::Error,
    },

    #[snafu(display("failed to parse URL"))]
    UrlParse {
        source: url::ParseError,
    },
}

impl Error {
    /// Whether this error indicates a missing or rejected credential.
    ///
    /// Validation is deferred to the first real network call, so credential
    /// problems arrive as HTTP 401/403 responses rather than being caught at
    /// client construction.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Error::BadResponse { code: 401 | 403, .. } | Error::MissingApiKey)
    }

    /// Whether the provider rejected the request with "Requested entity was
    /// not found".
    ///
    /// The provider returns this for long-running operations when the key
    /// that created them became invalid mid-job, so callers treat it as a
    /// hint to re-select the credential.
    pub fn is_entity_not_found(&self) -> bool {
        match self {
            Error::BadResponse { code: 404, .. } => true,
            Error::BadResponse { description: Some(description), .. } => {
                description.contains("Requested entity was not found")
            }
            _ => false,
        }
    }
}

//! # adlab-gemini
//!
//! Rust client for the Gemini generative endpoints consumed by the adlab
//! ad-production console.
//!
//! The crate covers the four remote contracts the console depends on:
//!
//! - **`generation`** — content generation: text, structured JSON (response
//!   schema), inline image output, image editing, and search-grounded chat
//! - **`video`** — long-running video synthesis: submit a job, re-fetch the
//!   operation handle until it reports done, download the result bytes
//! - **`client`** — the configured HTTP client bound to one credential
//! - **`credential`** — the explicit credential value the client is built from
//!
//! Building a client is pure configuration — no connection is held — so a
//! fresh client may be constructed per call, which is how credential rotation
//! takes effect mid-session:
//!
//! ```rust,no_run
//! use adlab_gemini::{Credential, Gemini, Model};
//!
//! # async fn run() -> Result<(), adlab_gemini::Error> {
//! let gemini = Gemini::new(Credential::new("YOUR_API_KEY"))?;
//! let response = gemini
//!     .generate_content()
//!     .with_user_message("Write a tagline for a coffee brand")
//!     .execute()
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! The client never validates the credential eagerly; the first real network
//! call surfaces credential failures, which callers can classify with
//! [`Error::is_unauthenticated`] and [`Error::is_entity_not_found`].

pub mod client;
pub mod credential;
pub mod error;
pub mod generation;
pub mod model;
pub mod video;

/// The configured Gemini API client
pub use client::Gemini;
/// Builder for creating a Gemini client
pub use client::GeminiBuilder;
/// Explicit API credential value
pub use credential::Credential;
/// The client error type
pub use error::Error;
/// Available Gemini models
pub use model::Model;

pub use generation::{
    Blob, Candidate, Content, ContentBuilder, GenerateContentRequest, GenerationConfig,
    GenerationResponse, GroundingChunk, GroundingMetadata, ImageConfig, Part, Role, Tool,
    WebGroundingChunk,
};

pub use video::{
    GeneratedVideo, OperationError, VideoBuilder, VideoGenerationConfig, VideoOperation,
};

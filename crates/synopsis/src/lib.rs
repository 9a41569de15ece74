#![deny(warnings)]

//! Movie synopsis generation.
//!
//! The game only needs an opaque `title + genre -> text` capability. A hosted
//! text-generation backend is optional: without credentials a placeholder is
//! used, and a failing or slow backend degrades to a fixed failure text so
//! production start never blocks.

mod gemini;

pub use gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;
use std::time::Duration;
use studio_core::Genre;
use tracing::warn;

/// Default upper bound on a single generation call.
pub const DEFAULT_SYNOPSIS_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, thiserror::Error)]
pub enum SynopsisError {
    #[error("synopsis request failed: {0}")]
    RequestFailed(String),
    #[error("invalid synopsis response: {0}")]
    InvalidResponse(String),
    #[error("synopsis generation timed out after {0:?}")]
    TimedOut(Duration),
}

/// Something that can write a synopsis for a movie.
#[async_trait]
pub trait SynopsisGenerator: Send + Sync {
    async fn generate(&self, title: &str, genre: Genre) -> Result<String, SynopsisError>;
}

/// Prompt sent to text-generation backends.
pub fn synopsis_prompt(title: &str, genre: Genre) -> String {
    format!(
        "Generate a short, exciting, one-paragraph movie synopsis for a {genre} film titled \"{title}\". Make it sound like a blockbuster hit."
    )
}

/// Text used when no backend is configured.
pub fn placeholder_synopsis(title: &str, genre: Genre) -> String {
    format!(
        "This is a placeholder synopsis for '{title}', a gripping {genre} film. It's a tale of adventure, love, and betrayal that will keep you on the edge of your seat."
    )
}

/// Text used when the backend fails or times out.
pub fn failed_synopsis(title: &str) -> String {
    format!("Failed to generate synopsis for '{title}'. Please try again.")
}

/// Offline generator that always returns the placeholder text.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderSynopsis;

#[async_trait]
impl SynopsisGenerator for PlaceholderSynopsis {
    async fn generate(&self, title: &str, genre: Genre) -> Result<String, SynopsisError> {
        Ok(placeholder_synopsis(title, genre))
    }
}

/// Generate a synopsis, never failing.
///
/// `None` yields the placeholder. Errors and calls exceeding `timeout` yield
/// the failure text.
pub async fn synopsis_or_fallback(
    generator: Option<&dyn SynopsisGenerator>,
    title: &str,
    genre: Genre,
    timeout: Duration,
) -> String {
    let Some(generator) = generator else {
        return placeholder_synopsis(title, genre);
    };
    let result = match tokio::time::timeout(timeout, generator.generate(title, genre)).await {
        Ok(result) => result,
        Err(_) => Err(SynopsisError::TimedOut(timeout)),
    };
    match result {
        Ok(text) => text,
        Err(err) => {
            warn!(title, %genre, error = %err, "synopsis generation failed");
            failed_synopsis(title)
        }
    }
}

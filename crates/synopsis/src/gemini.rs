//! Client for the hosted Gemini `generateContent` endpoint.

use crate::{synopsis_prompt, SynopsisError, SynopsisGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studio_core::Genre;
use tracing::debug;

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for synopsis generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self::with_timeout(base_url, model, api_key, 30)
    }

    /// Create client with custom timeout.
    pub fn with_timeout(base_url: &str, model: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create client from environment variables.
    ///
    /// Reads the key from `GEMINI_API_KEY`, then `API_KEY`. Returns `None`
    /// when neither is set. `GEMINI_BASE_URL` and `GEMINI_MODEL` override the
    /// defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Some(Self::new(&base_url, &model, &api_key))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_request(title: &str, genre: Genre) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(synopsis_prompt(title, genre)),
            }],
        }],
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, SynopsisError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(SynopsisError::InvalidResponse("no text in first candidate".into()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl SynopsisGenerator for GeminiClient {
    async fn generate(&self, title: &str, genre: Genre) -> Result<String, SynopsisError> {
        debug!(model = %self.model, title, "requesting synopsis");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(title, genre))
            .send()
            .await
            .map_err(|e| SynopsisError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| SynopsisError::RequestFailed(e.to_string()))?;
            return Err(SynopsisError::RequestFailed(format!("{status}: {error_text}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SynopsisError::InvalidResponse(e.to_string()))?;
        extract_text(body)
    }
}

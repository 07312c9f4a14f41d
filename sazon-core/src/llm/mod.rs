//! Generative model abstraction for recipe generation.
//!
//! Providers take a prompt plus an optional JSON response schema and return
//! the model's raw text. Parsing that text is the caller's job.

mod fake;
mod gemini;

pub use fake::{FakeProvider, SAMPLE_RECIPE_JSON};
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A single-turn generation request.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    /// When set, the provider is asked for `application/json` matching this schema.
    pub response_schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Trait for generative model providers.
///
/// Implementations must be stateless and thread-safe; one instance is shared
/// by every request the server handles.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Provider name, e.g. "gemini" or "fake".
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Build the provider selected by the environment.
///
/// - `AI_PROVIDER`: "gemini" | "fake" (default: "gemini" when `GEMINI_API_KEY`
///   is set, otherwise "fake")
/// - `GEMINI_API_KEY`: API key for Gemini
/// - `GEMINI_MODEL`: model name (default: "gemini-2.5-flash")
/// - `GEMINI_TIMEOUT_SECS`: whole-request timeout (default: 60)
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, LlmError> {
    let api_key = std::env::var("GEMINI_API_KEY").ok();
    let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| {
        if api_key.is_some() {
            "gemini".to_string()
        } else {
            "fake".to_string()
        }
    });

    match provider.as_str() {
        "fake" => Ok(Box::new(FakeProvider::default())),
        "gemini" => {
            let api_key = api_key
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;
            let model = std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
            let timeout = match std::env::var("GEMINI_TIMEOUT_SECS") {
                Ok(raw) => raw.parse().map(std::time::Duration::from_secs).map_err(|_| {
                    LlmError::NotConfigured(format!("Invalid GEMINI_TIMEOUT_SECS: {raw}"))
                })?,
                Err(_) => gemini::DEFAULT_TIMEOUT,
            };
            Ok(Box::new(GeminiProvider::new(api_key, model, timeout)?))
        }
        other => Err(LlmError::NotConfigured(format!(
            "Unknown provider: {}",
            other
        ))),
    }
}

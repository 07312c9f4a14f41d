//! Fake provider for tests and local development.
//!
//! Responses are matched by checking whether the prompt contains a registered
//! substring, so tests run without network access or API keys.

use super::{CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// A canned recipe that satisfies the generation schema.
pub const SAMPLE_RECIPE_JSON: &str = r#"{
    "name": "Tomato Rice",
    "description": "A quick one-pot rice with tomato and garlic.",
    "preparationTime": 30,
    "ingredients": [
        {"name": "Rice", "quantity": "200", "unit_of_measure": "grams"},
        {"name": "Tomato", "quantity": "2", "unit_of_measure": "units"},
        {"name": "Salt", "quantity": "", "unit_of_measure": "to taste"}
    ],
    "instructions": [
        "Fry the garlic in olive oil.",
        "Add the chopped tomato and cook for five minutes.",
        "Add the rice and water, then simmer for eighteen minutes."
    ],
    "type": "lunch"
}"#;

#[derive(Debug)]
pub struct FakeProvider {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Returned when no pattern matches. `None` makes unmatched prompts fail.
    default_response: Option<String>,
    calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: Some(SAMPLE_RECIPE_JSON.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// A provider with no registered responses that fails every request.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(prompt_contains.to_string(), response.to_string());
        }
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of `complete` calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let prompt_lower = request.prompt.to_lowercase();
        if let Ok(responses) = self.responses.read() {
            for (pattern, response) in responses.iter() {
                if prompt_lower.contains(&pattern.to_lowercase()) {
                    return Ok(response.clone());
                }
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                request.prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

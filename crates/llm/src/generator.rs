//! Prompt-in, text-out generation capability.
//!
//! [`Generator`] is the narrow interface the workflow depends on; test doubles
//! implement it directly. [`LlmGenerator`] adapts any [`LlmClient`] to it.

use crate::client::{LlmClient, LlmRequest};
use grounded_core::{AppError, AppResult};
use std::sync::Arc;

/// Turns a fully assembled prompt into generated text.
///
/// Implementations return non-empty text or `AppError::Generation`.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Default prompt ceiling, in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 200_000;

/// [`Generator`] backed by an LLM provider.
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_prompt_chars: usize,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the prompt length ceiling.
    pub fn with_max_prompt_chars(mut self, max_prompt_chars: usize) -> Self {
        self.max_prompt_chars = max_prompt_chars;
        self
    }

    fn build_request(&self, prompt: &str) -> AppResult<LlmRequest> {
        if prompt.trim().is_empty() {
            return Err(AppError::Generation("Prompt is empty".to_string()));
        }

        let chars = prompt.chars().count();
        if chars > self.max_prompt_chars {
            return Err(AppError::Generation(format!(
                "Prompt is {} characters, limit is {}",
                chars, self.max_prompt_chars
            )));
        }

        let mut request = LlmRequest::new(prompt, &self.model);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        Ok(request)
    }
}

#[async_trait::async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = self.build_request(prompt)?;
        let response = self.client.complete(&request).await?;

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Generation finished"
        );

        check_completion(&response.content, response.done)?;
        Ok(response.content)
    }
}

/// Reject completions that must not be passed on as an answer.
pub fn check_completion(content: &str, done: bool) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::Generation(
            "Model returned an empty completion".to_string(),
        ));
    }

    if !done {
        return Err(AppError::Generation(
            "Model stopped before finishing the completion".to_string(),
        ));
    }

    Ok(())
}

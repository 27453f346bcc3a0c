//! OpenAI-compatible provider implementation.
//!
//! This module provides the [`OpenAiProvider`] which implements the
//! [`CompletionProvider`] trait for any OpenAI-compatible chat completions
//! endpoint. The same adapter serves both the `openai` and `openrouter`
//! registry keys; only the base URL and API key differ.

use super::provider::{
    ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse, TokenUsage,
};
use crate::error::{ProfilerError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI chat completions endpoint.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenRouter chat completions endpoint.
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Provider name used in logs and error messages.
    pub name: String,
    /// Chat completions endpoint URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Configuration for the OpenAI endpoint.
    pub fn openai() -> Self {
        Self {
            name: "OpenAI".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Configuration for the OpenRouter endpoint.
    pub fn openrouter() -> Self {
        Self {
            name: "OpenRouter".to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Override the endpoint URL (useful for proxies or custom gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Provider adapter for OpenAI-compatible chat completion APIs.
///
/// # Example
///
/// ```rust,ignore
/// use tablescope::llm::OpenAiProvider;
///
/// let openai = OpenAiProvider::openai("your-api-key")?;
/// let openrouter = OpenAiProvider::openrouter("your-api-key")?;
/// ```
pub struct OpenAiProvider {
    api_key: String,
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a provider against the OpenAI endpoint.
    pub fn openai(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::openai())
    }

    /// Create a provider against the OpenRouter endpoint.
    pub fn openrouter(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::openrouter())
    }

    /// Create a provider with a custom endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProfilerError::Provider {
                provider: config.name.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    fn provider_error(&self, reason: impl Into<String>) -> ProfilerError {
        ProfilerError::Provider {
            provider: self.config.name.clone(),
            reason: reason.into(),
        }
    }
}

impl CompletionProvider for OpenAiProvider {
    fn submit(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| self.provider_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(self.provider_error(format!("API error {status}: {text}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .map_err(|e| self.provider_error(format!("invalid response body: {e}")))?;

        let content = result
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .ok_or_else(|| self.provider_error("no response content"))?;

        let usage = result.usage.unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

// ============================================================================
// Tests
// ============================================================================

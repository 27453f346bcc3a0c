//! Google Gemini provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`CompletionProvider`] trait for Google's Gemini generateContent API
//! (<https://ai.google.dev/>). It handles both plain chat completions and
//! multi-part vision requests, translating inlined data-URI images into
//! Gemini's inline-data parts.

use super::provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, ContentPart, MessageContent,
    TokenUsage,
};
use crate::error::{ProfilerError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API endpoint prefix; the model name and action are appended.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// Gemini API request structures
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// Gemini API response structures
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize, Default)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: u64,
}

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Google Gemini provider adapter.
///
/// The model identifier comes from each request (the router strips the
/// `gemini/` prefix before dispatch), so one provider instance serves every
/// Gemini model.
///
/// # Example
///
/// ```rust,ignore
/// use tablescope::llm::GeminiProvider;
///
/// let provider = GeminiProvider::new("your-api-key")?;
/// ```
pub struct GeminiProvider {
    api_key: String,
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeminiConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProfilerError::Provider {
                provider: "Gemini".to_string(),
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
            provider: "Gemini".to_string(),
            reason: reason.into(),
        }
    }

    /// Translate router messages into Gemini contents.
    ///
    /// Gemini only knows "user" and "model" roles; system messages become
    /// user turns, and data-URI image references become inline-data parts.
    fn build_contents(&self, request: &CompletionRequest) -> Result<Vec<Content>> {
        let mut contents = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            let role = match message.role.as_str() {
                "assistant" => "model",
                _ => "user",
            };

            let parts = match &message.content {
                MessageContent::Text(text) => vec![Part::Text(text.clone())],
                MessageContent::Parts(message_parts) => {
                    let mut parts = Vec::with_capacity(message_parts.len());
                    for part in message_parts {
                        match part {
                            ContentPart::Text { text } => parts.push(Part::Text(text.clone())),
                            ContentPart::ImageUrl { image_url } => {
                                parts.push(Part::InlineData(parse_data_uri(&image_url.url).ok_or_else(
                                    || self.provider_error("image reference is not a data URI"),
                                )?));
                            }
                        }
                    }
                    parts
                }
            };

            contents.push(Content {
                role: role.to_string(),
                parts,
            });
        }

        Ok(contents)
    }
}

/// Split `data:image/png;base64,<payload>` into mime type and payload.
fn parse_data_uri(uri: &str) -> Option<InlineData> {
    let rest = uri.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    Some(InlineData {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

impl CompletionProvider for GeminiProvider {
    fn submit(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = GeminiRequest {
            contents: self.build_contents(request)?,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        // Build URL: {base_url}{model}:generateContent?key={api_key}
        let url = format!(
            "{}{}:generateContent?key={}",
            self.config.base_url, request.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| self.provider_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(self.provider_error(format!("API error {status}: {text}")));
        }

        let result: GeminiResponse = response
            .json()
            .map_err(|e| self.provider_error(format!("invalid response body: {e}")))?;

        // Responses blocked by safety filters carry no usable content
        let content = result
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|c| {
                if let Some(reason) = &c.finish_reason
                    && (reason == "SAFETY" || reason == "BLOCKED")
                {
                    return None;
                }
                c.content.as_ref()
            })
            .and_then(|content| content.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text(text) => Some(text.as_str()),
                        Part::InlineData(_) => None,
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| self.provider_error("no response content"))?;

        let usage = result.usage_metadata.unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            },
        })
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

// ============================================================================
// Tests
// ============================================================================

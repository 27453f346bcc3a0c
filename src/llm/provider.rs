//! Completion provider trait and the shared request/response types.
//!
//! This module defines the [`CompletionProvider`] trait that enables support
//! for multiple model backends (OpenAI, OpenRouter, Gemini, etc.) without
//! the router knowing anything provider-specific.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/llm/` (e.g., `anthropic.rs`)
//! 2. Implement the [`CompletionProvider`] trait for your provider struct
//! 3. Export the provider in `src/llm/mod.rs` and register it with the
//!    router under its model-identifier prefix
//!
//! # Example
//!
//! ```rust,ignore
//! use tablescope::llm::{CompletionRouter, OpenAiProvider};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let provider = OpenAiProvider::openai("your-api-key")?;
//! let mut providers: HashMap<String, Arc<dyn CompletionProvider>> = HashMap::new();
//! providers.insert("openai".to_string(), Arc::new(provider));
//! let router = CompletionRouter::new(providers);
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant".
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Multi-part user message carrying a text instruction plus an inlined
    /// data-URI image reference.
    pub fn user_with_image(text: impl Into<String>, image_uri: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_uri.into(),
                    },
                },
            ]),
        }
    }
}

/// Message content: plain text or a multi-part body (for vision).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten the content to plain text, ignoring image parts.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One part of a multi-part message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference; `url` holds a `data:image/...;base64,...` URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A fully resolved request handed to one provider adapter.
///
/// `model` is the provider-local identifier, with the routing prefix already
/// stripped (e.g. `gpt-5-mini`, not `openai/gpt-5-mini`).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Sampling parameters plus routing hints for one completion.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    /// Task tag looked up in the router's task table.
    pub task: Option<String>,
    /// Explicit provider-qualified model; set, it bypasses task routing.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            task: None,
            model: None,
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

impl CompletionParams {
    pub fn for_task(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A successful completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    /// The provider-qualified identifier of the model that answered.
    pub model: String,
    pub usage: TokenUsage,
}

/// Trait for model backends the router can dispatch to.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the router is shared across
/// threads behind an `Arc`.
///
/// # Error Handling
///
/// A failed submission is an ordinary per-candidate failure: the router
/// logs it and moves to the next candidate in the route.
pub trait CompletionProvider: Send + Sync {
    /// Submit one completion request and return the model's answer.
    fn submit(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name for logging and debugging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_flat() {
        let message = ChatMessage::user("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_multipart_message_shape() {
        let message = ChatMessage::user_with_image("read this", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&message).unwrap();
        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "read this");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_content_as_text_ignores_images() {
        let message = ChatMessage::user_with_image("caption", "data:image/png;base64,AAAA");
        assert_eq!(message.content.as_text(), "caption");
    }

    #[test]
    fn test_params_builders() {
        let params = CompletionParams::for_task("data_profiling")
            .with_temperature(0.3)
            .with_max_tokens(2000);
        assert_eq!(params.task.as_deref(), Some("data_profiling"));
        assert!(params.model.is_none());
        assert_eq!(params.temperature, 0.3);
        assert_eq!(params.max_tokens, 2000);
    }
}

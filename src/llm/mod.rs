//! Multi-provider completion routing.
//!
//! The [`CompletionRouter`] dispatches chat completions over any set of
//! [`CompletionProvider`] implementations, trying model candidates in a
//! fixed order with automatic fallback. The bundled HTTP adapters
//! ([`OpenAiProvider`], [`GeminiProvider`]) require the `llm` feature;
//! the router and trait themselves do not.

mod provider;
mod router;

#[cfg(feature = "llm")]
mod gemini;
#[cfg(feature = "llm")]
mod openai;

pub use provider::{
    ChatMessage, CompletionParams, CompletionProvider, CompletionRequest, CompletionResponse,
    ContentPart, ImageUrl, MessageContent, TokenUsage,
};
pub use router::{CompletionRouter, RouterConfig, RouterConfigBuilder};

#[cfg(feature = "llm")]
pub use gemini::{GeminiConfig, GeminiProvider};
#[cfg(feature = "llm")]
pub use openai::{OpenAiConfig, OpenAiProvider};

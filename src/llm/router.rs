//! Multi-model completion routing with ordered fallback.
//!
//! The router resolves a task tag (or explicit model) into an ordered list
//! of provider-qualified model candidates and tries them strictly in order,
//! one request each, never retrying a candidate. Routing tables are fixed at
//! construction; the router itself is immutable and shareable via `Arc`.

use super::provider::{
    ChatMessage, CompletionParams, CompletionProvider, CompletionRequest, CompletionResponse,
};
use crate::error::{ProfilerError, Result};
use crate::types::ModelCandidate;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Routing tables and pricing, fixed at router construction.
///
/// Request timeouts are not configured here: each injected provider owns
/// its HTTP client and its timeout (see `OpenAiConfig`, `GeminiConfig`).
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Alias to provider-qualified model identifier
    /// (e.g. `claude` -> `openrouter/anthropic/claude-sonnet-4`).
    pub model_map: HashMap<String, String>,
    /// Task tag to ordered list of aliases.
    pub task_routing: HashMap<String, Vec<String>>,
    /// Aliases tried for tasks missing from `task_routing`.
    pub default_route: Vec<String>,
    /// Pricing table for [`CompletionRouter::estimate_cost`].
    pub pricing: Vec<ModelCandidate>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let model_map = HashMap::from([
            (
                "claude".to_string(),
                "openrouter/anthropic/claude-sonnet-4".to_string(),
            ),
            ("gpt5".to_string(), "openai/gpt-5-mini".to_string()),
            ("gemini".to_string(), "gemini/gemini-2.0-flash".to_string()),
            ("vision".to_string(), "gemini/gemini-2.0-flash".to_string()),
        ]);

        let task_routing = HashMap::from([
            (
                "data_profiling".to_string(),
                vec!["claude".to_string(), "gpt5".to_string()],
            ),
            (
                "sql_generation".to_string(),
                vec!["claude".to_string(), "gpt5".to_string()],
            ),
            (
                "vision_ocr".to_string(),
                vec!["gemini".to_string(), "gpt5".to_string()],
            ),
            (
                "code_generation".to_string(),
                vec!["gpt5".to_string(), "claude".to_string()],
            ),
            (
                "complex_reasoning".to_string(),
                vec!["claude".to_string(), "gpt5".to_string()],
            ),
            (
                "simple_query".to_string(),
                vec!["gpt5".to_string(), "claude".to_string()],
            ),
        ]);

        Self {
            model_map,
            task_routing,
            default_route: vec!["claude".to_string(), "gpt5".to_string()],
            pricing: vec![
                ModelCandidate::new("openrouter/anthropic/claude-sonnet-4", 3.0, 15.0),
                ModelCandidate::new("openai/gpt-5-mini", 0.15, 0.60),
                ModelCandidate::new("gemini/gemini-2.0-flash", 0.0, 0.0),
            ],
        }
    }
}

impl RouterConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::default()
    }
}

/// Builder for [`RouterConfig`]. Unset fields keep the default tables.
#[derive(Default)]
pub struct RouterConfigBuilder {
    model_map: Option<HashMap<String, String>>,
    task_routing: Option<HashMap<String, Vec<String>>>,
    default_route: Option<Vec<String>>,
    pricing: Option<Vec<ModelCandidate>>,
}

impl RouterConfigBuilder {
    /// Replace the alias table.
    pub fn model_map(mut self, model_map: HashMap<String, String>) -> Self {
        self.model_map = Some(model_map);
        self
    }

    /// Replace the task routing table.
    pub fn task_routing(mut self, task_routing: HashMap<String, Vec<String>>) -> Self {
        self.task_routing = Some(task_routing);
        self
    }

    /// Replace the default route.
    pub fn default_route(mut self, default_route: Vec<String>) -> Self {
        self.default_route = Some(default_route);
        self
    }

    /// Replace the pricing table.
    pub fn pricing(mut self, pricing: Vec<ModelCandidate>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RouterConfig {
        let defaults = RouterConfig::default();
        RouterConfig {
            model_map: self.model_map.unwrap_or(defaults.model_map),
            task_routing: self.task_routing.unwrap_or(defaults.task_routing),
            default_route: self.default_route.unwrap_or(defaults.default_route),
            pricing: self.pricing.unwrap_or(defaults.pricing),
        }
    }
}

/// Completion router dispatching over registered providers.
///
/// Providers are keyed by the prefix of the qualified model identifier:
/// `openai/gpt-5-mini` goes to the provider registered under `openai` with
/// the local model id `gpt-5-mini`.
pub struct CompletionRouter {
    config: RouterConfig,
    providers: HashMap<String, Arc<dyn CompletionProvider>>,
}

impl CompletionRouter {
    /// Create a router over the given providers with default routing tables.
    pub fn new(providers: HashMap<String, Arc<dyn CompletionProvider>>) -> Self {
        Self::with_config(RouterConfig::default(), providers)
    }

    /// Create a router with custom routing tables.
    pub fn with_config(
        config: RouterConfig,
        providers: HashMap<String, Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self { config, providers }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Resolve the ordered candidate list for one completion.
    ///
    /// An explicit model short-circuits routing entirely; otherwise the task
    /// tag selects a route (falling back to the default route) and each alias
    /// is mapped through the alias table. Aliases missing from the table pass
    /// through unchanged, so callers can route on qualified identifiers too.
    fn resolve_candidates(&self, params: &CompletionParams) -> Vec<String> {
        if let Some(model) = &params.model {
            return vec![model.clone()];
        }

        let aliases = params
            .task
            .as_deref()
            .and_then(|task| self.config.task_routing.get(task))
            .unwrap_or(&self.config.default_route);

        aliases
            .iter()
            .map(|alias| {
                self.config
                    .model_map
                    .get(alias)
                    .cloned()
                    .unwrap_or_else(|| alias.clone())
            })
            .collect()
    }

    /// Run one completion with ordered fallback.
    ///
    /// Each candidate gets exactly one attempt; a failure is logged and the
    /// next candidate is tried. When the list is exhausted the last error is
    /// surfaced in [`ProfilerError::AllProvidersFailed`].
    pub fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: &CompletionParams,
    ) -> Result<CompletionResponse> {
        let candidates = self.resolve_candidates(params);
        let mut last_error = "no model candidates configured".to_string();

        for candidate in &candidates {
            info!("Attempting completion with model: {}", candidate);

            match self.submit_to(candidate, &messages, params) {
                Ok(mut response) => {
                    response.model = candidate.clone();
                    return Ok(response);
                }
                Err(e) => {
                    warn!("Model {} failed: {}", candidate, e);
                    last_error = e.to_string();
                }
            }
        }

        error!("All models failed. Last error: {}", last_error);
        Err(ProfilerError::AllProvidersFailed {
            attempted: candidates.len(),
            last_error,
        })
    }

    fn submit_to(
        &self,
        candidate: &str,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<CompletionResponse> {
        let (prefix, local_model) = candidate
            .split_once('/')
            .ok_or_else(|| ProfilerError::UnknownProvider(candidate.to_string()))?;

        let provider = self
            .providers
            .get(prefix)
            .ok_or_else(|| ProfilerError::UnknownProvider(candidate.to_string()))?;

        let request = CompletionRequest {
            model: local_model.to_string(),
            messages: messages.to_vec(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        provider.submit(&request)
    }

    /// Single-shot vision completion against the `vision` alias (or an
    /// explicit model). No fallback: vision requests fail outright.
    pub fn complete_with_vision(
        &self,
        text_prompt: &str,
        image_data: &[u8],
        image_format: &str,
        model: Option<&str>,
    ) -> Result<CompletionResponse> {
        let candidate = match model {
            Some(model) => model.to_string(),
            None => self
                .config
                .model_map
                .get("vision")
                .cloned()
                .ok_or_else(|| ProfilerError::UnknownProvider("vision".to_string()))?,
        };

        let image_uri = format!(
            "data:image/{};base64,{}",
            image_format,
            BASE64.encode(image_data)
        );
        let messages = vec![ChatMessage::user_with_image(text_prompt, image_uri)];
        let params = CompletionParams::default();

        info!("Vision completion with model: {}", candidate);
        let mut response = self.submit_to(&candidate, &messages, &params)?;
        response.model = candidate;
        Ok(response)
    }

    /// Estimate the cost in USD of a completion against the pricing table.
    ///
    /// Unknown models cost 0.0; the lookup is an exact identifier match.
    pub fn estimate_cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> f64 {
        match self.config.pricing.iter().find(|c| c.model == model) {
            Some(candidate) => {
                let input_cost =
                    (input_tokens as f64 / 1_000_000.0) * candidate.input_cost_per_million;
                let output_cost =
                    (output_tokens as f64 / 1_000_000.0) * candidate.output_cost_per_million;
                input_cost + output_cost
            }
            None => 0.0,
        }
    }
}

//! Tabular Dataset Profiling Library
//!
//! An LLM-assisted profiling and quality-analysis library for tabular data,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! This library provides automated dataset profiling capabilities including:
//!
//! - **Dataset Loading**: CSV, Excel, JSON, and Parquet ingestion into Polars frames
//! - **Statistics**: Whole-table aggregates and typed per-column summaries
//! - **Quality Analysis**: Rule-based detection of nulls, duplicates, and cardinality issues
//! - **LLM Insights**: Optional natural-language analysis via a multi-provider router
//! - **Graceful Degradation**: Reports succeed even when every model provider is down
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tablescope::{CompletionRouter, DataProfiler, InsightSynthesizer};
//! use tablescope::llm::{CompletionProvider, OpenAiProvider};
//! use std::collections::HashMap;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! // Option 1: Statistics and quality findings only (no LLM required)
//! let profiler = DataProfiler::new();
//! let report = profiler.profile_file(Path::new("data.csv"), "data.csv", None);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Option 2: With LLM insights and automatic provider fallback
//! let mut providers: HashMap<String, Arc<dyn CompletionProvider>> = HashMap::new();
//! providers.insert("openai".to_string(), Arc::new(OpenAiProvider::openai(api_key)?));
//! let router = Arc::new(CompletionRouter::new(providers));
//! let synthesizer = InsightSynthesizer::new(router);
//!
//! let report = profiler.profile_file(Path::new("data.csv"), "data.csv", Some(&synthesizer));
//! ```
//!
//! # Model Providers
//!
//! The completion router dispatches over backends implementing the
//! [`llm::CompletionProvider`] trait. Bundled adapters (behind the default
//! `llm` feature):
//!
//! - [`llm::OpenAiProvider`] - OpenAI-compatible chat APIs (OpenAI, OpenRouter)
//! - [`llm::GeminiProvider`] - Google Gemini API
//!
//! To implement your own provider, see the [`llm`] module documentation.
//!
//! # Configuration
//!
//! Use [`ProfilerConfig`] to customize quality thresholds and prompt caps:
//!
//! ```rust,ignore
//! use tablescope::ProfilerConfig;
//!
//! let config = ProfilerConfig::builder()
//!     .high_null_threshold(60.0)    // Flag columns with >60% nulls as high
//!     .medium_null_threshold(30.0)
//!     .max_prompt_columns(20)
//!     .build()?;
//! ```

pub mod config;
pub mod error;
pub mod insight;
pub mod llm;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod types;

pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ProfilerError, Result, ResultExt};
pub use insight::InsightSynthesizer;
pub use llm::{CompletionParams, CompletionResponse, CompletionRouter, RouterConfig};
pub use loader::{DatasetLoader, SUPPORTED_EXTENSIONS};
pub use profiler::DataProfiler;
pub use quality::DataQualityAnalyzer;
pub use types::{
    BasicStats, ColumnProfile, ColumnStats, ColumnType, LlmInsight, ModelCandidate, ProfileReport,
    QualityIssue, Severity,
};

//! CLI entry point for the dataset profiler.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use tablescope::{DataProfiler, InsightSynthesizer, ProfilerConfig};
use tracing::warn;

#[cfg(feature = "llm")]
use std::collections::HashMap;
#[cfg(feature = "llm")]
use std::env;
#[cfg(feature = "llm")]
use std::sync::Arc;
#[cfg(feature = "llm")]
use tablescope::CompletionRouter;
#[cfg(feature = "llm")]
use tablescope::llm::{CompletionProvider, GeminiProvider, OpenAiProvider};
#[cfg(feature = "llm")]
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "LLM-assisted profiling for tabular datasets",
    long_about = "Profiles a tabular data file: descriptive statistics, quality findings,\n\
                  and an optional LLM-written analysis with multi-provider fallback.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENAI_API_KEY        API key for OpenAI\n  \
                  OPENROUTER_API_KEY    API key for OpenRouter\n  \
                  GOOGLE_API_KEY        API key for Google Gemini\n\n\
                  EXAMPLES:\n  \
                  # Profile a CSV with LLM insights\n  \
                  tablescope data.csv\n\n  \
                  # Statistics and quality findings only\n  \
                  tablescope data.csv --no-llm\n\n  \
                  # Clean JSON on stdout for piping\n  \
                  tablescope data.csv --json | jq .quality_issues"
)]
struct Args {
    /// Path to the data file (.csv, .xlsx, .xls, .json, .parquet)
    input: String,

    /// Declared file name used for format detection
    ///
    /// If not specified, the input path's file name is used. Useful when the
    /// file is stored under an opaque upload identifier.
    #[arg(long)]
    file_name: Option<String>,

    /// Skip LLM insight generation
    #[arg(long)]
    no_llm: bool,

    /// Null percentage above which a column is flagged high severity
    #[arg(long, default_value = "50.0")]
    high_null_threshold: f64,

    /// Null percentage above which a column is flagged medium severity
    #[arg(long, default_value = "20.0")]
    medium_null_threshold: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output only the JSON report on stdout
    ///
    /// Disables all logging; useful for piping to other tools.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Build the provider registry from whichever API keys are present in the
/// environment. Returns `None` when no provider is configured.
#[cfg(feature = "llm")]
fn build_synthesizer(config: ProfilerConfig) -> Result<Option<InsightSynthesizer>> {
    let mut providers: HashMap<String, Arc<dyn CompletionProvider>> = HashMap::new();

    if let Ok(key) = env::var("OPENAI_API_KEY")
        && !key.is_empty()
    {
        providers.insert("openai".to_string(), Arc::new(OpenAiProvider::openai(key)?));
    }
    if let Ok(key) = env::var("OPENROUTER_API_KEY")
        && !key.is_empty()
    {
        providers.insert(
            "openrouter".to_string(),
            Arc::new(OpenAiProvider::openrouter(key)?),
        );
    }
    if let Ok(key) = env::var("GOOGLE_API_KEY")
        && !key.is_empty()
    {
        providers.insert("gemini".to_string(), Arc::new(GeminiProvider::new(key)?));
    }

    if providers.is_empty() {
        return Ok(None);
    }

    info!(
        "LLM providers configured: {}",
        providers.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    let router = Arc::new(CompletionRouter::new(providers));
    Ok(Some(InsightSynthesizer::with_config(router, config)))
}

#[cfg(not(feature = "llm"))]
fn build_synthesizer(_config: ProfilerConfig) -> Result<Option<InsightSynthesizer>> {
    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load API keys from a .env file when present
    dotenv().ok();

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let file_name = match &args.file_name {
        Some(name) => name.clone(),
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("Cannot determine file name from: {}", args.input))?,
    };

    let config = ProfilerConfig::builder()
        .high_null_threshold(args.high_null_threshold)
        .medium_null_threshold(args.medium_null_threshold)
        .build()?;

    let synthesizer = if args.no_llm {
        None
    } else {
        let synthesizer = build_synthesizer(config.clone())?;
        if synthesizer.is_none() {
            warn!("No LLM provider API keys found; skipping insight generation");
        }
        synthesizer
    };

    let profiler = DataProfiler::with_config(config);
    let report = profiler.profile_file(input, &file_name, synthesizer.as_ref());

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

//! LLM insight generation from profiling results.
//!
//! The synthesizer formats a compact prompt out of the computed statistics,
//! quality findings, and a few sample rows, then asks the completion router
//! for a narrative analysis. Router failures never escape: they degrade into
//! an [`LlmInsight`] carrying the error text, and the report still succeeds.

use crate::config::ProfilerConfig;
use crate::llm::{ChatMessage, CompletionParams, CompletionRouter};
use crate::types::{BasicStats, ColumnProfile, LlmInsight, QualityIssue};
use std::sync::Arc;
use tracing::{error, info};

/// Routing task tag for insight generation.
const INSIGHT_TASK: &str = "data_profiling";

/// Sampling temperature for insight completions.
const INSIGHT_TEMPERATURE: f32 = 0.3;

/// Response budget for insight completions.
const INSIGHT_MAX_TOKENS: u32 = 2000;

/// Turns profiling output into a natural-language summary via the router.
pub struct InsightSynthesizer {
    router: Arc<CompletionRouter>,
    config: ProfilerConfig,
}

impl InsightSynthesizer {
    /// Create a synthesizer with default prompt caps.
    pub fn new(router: Arc<CompletionRouter>) -> Self {
        Self::with_config(router, ProfilerConfig::default())
    }

    /// Create a synthesizer with custom prompt caps.
    pub fn with_config(router: Arc<CompletionRouter>, config: ProfilerConfig) -> Self {
        Self { router, config }
    }

    /// Generate insights for one profiled dataset.
    ///
    /// This never returns an error: when every model candidate fails, the
    /// result is the degraded placeholder with the failure recorded in
    /// [`LlmInsight::error`].
    pub fn generate(
        &self,
        basic_stats: &BasicStats,
        columns: &[ColumnProfile],
        quality_issues: &[QualityIssue],
        sample_rows: &[serde_json::Value],
    ) -> LlmInsight {
        let prompt = self.build_prompt(basic_stats, columns, quality_issues, sample_rows);
        let params = CompletionParams::for_task(INSIGHT_TASK)
            .with_temperature(INSIGHT_TEMPERATURE)
            .with_max_tokens(INSIGHT_MAX_TOKENS);

        match self.router.complete(vec![ChatMessage::user(prompt)], &params) {
            Ok(response) => {
                info!(
                    "Generated insights with {} ({} tokens)",
                    response.model, response.usage.total_tokens
                );
                LlmInsight {
                    insights: response.content,
                    model_used: Some(response.model),
                    tokens_used: Some(response.usage.total_tokens),
                    error: None,
                }
            }
            Err(e) => {
                error!("LLM insights generation failed: {}", e);
                LlmInsight::unavailable(e.to_string())
            }
        }
    }

    fn build_prompt(
        &self,
        basic_stats: &BasicStats,
        columns: &[ColumnProfile],
        quality_issues: &[QualityIssue],
        sample_rows: &[serde_json::Value],
    ) -> String {
        let rows_shown = sample_rows.len().min(self.config.max_prompt_rows);
        let sample_json = serde_json::to_string(&sample_rows[..rows_shown]).unwrap_or_default();

        format!(
            "You are a data analytics expert. Analyze this dataset profile and provide insights.\n\
             \n\
             DATASET OVERVIEW:\n\
             - Rows: {}\n\
             - Columns: {}\n\
             - Duplicate rows: {}\n\
             - Total nulls: {} ({:.1}%)\n\
             \n\
             COLUMN SUMMARY:\n\
             {}\n\
             \n\
             QUALITY ISSUES:\n\
             {}\n\
             \n\
             SAMPLE DATA (first {} rows):\n\
             {}\n\
             \n\
             Provide:\n\
             1. **Business Context**: What kind of data is this? What business domain does it belong to?\n\
             2. **Data Quality Assessment**: Overall quality rating (1-10) and key concerns\n\
             3. **Recommended Cleaning Steps**: Specific actions to improve data quality\n\
             4. **Potential Use Cases**: What analyses or insights could this data support?\n\
             5. **Schema Recommendations**: Suggested data types, indexes, or relationships\n\
             \n\
             Be concise but specific. Focus on actionable insights.",
            basic_stats.row_count,
            basic_stats.column_count,
            basic_stats.duplicate_rows,
            basic_stats.total_nulls,
            basic_stats.null_percentage,
            self.format_columns(columns),
            self.format_issues(quality_issues),
            rows_shown,
            sample_json,
        )
    }

    fn format_columns(&self, columns: &[ColumnProfile]) -> String {
        let cap = self.config.max_prompt_columns;
        let mut lines: Vec<String> = columns
            .iter()
            .take(cap)
            .map(|col| {
                format!(
                    "- {} ({}): {} unique, {:.1}% null",
                    col.name, col.dtype, col.unique_count, col.null_percentage
                )
            })
            .collect();

        if columns.len() > cap {
            lines.push(format!("... and {} more columns", columns.len() - cap));
        }

        lines.join("\n")
    }

    fn format_issues(&self, issues: &[QualityIssue]) -> String {
        if issues.is_empty() {
            return "No major quality issues detected".to_string();
        }

        let cap = self.config.max_prompt_issues;
        let mut lines: Vec<String> = issues
            .iter()
            .take(cap)
            .map(|issue| format!("- [{}] {}", issue.severity.label(), issue.description))
            .collect();

        if issues.len() > cap {
            lines.push(format!("... and {} more issues", issues.len() - cap));
        }

        lines.join("\n")
    }
}

//! Report data model for the profiling pipeline.
//!
//! Everything in here is derived, immutable once computed, and serializable.
//! A [`ProfileReport`] owns all of its children and has no back-references;
//! it is built once per profiling run and handed to the caller.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Detected element type of a column, resolved once at load time.
///
/// The statistics engine matches on this exhaustively, so a column can never
/// silently fall through with no stat set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Integer or floating-point column.
    Numeric,
    /// Strings and anything that is neither numeric nor temporal.
    Text,
    /// Date, datetime, or time-of-day column.
    Temporal,
}

impl ColumnType {
    /// Classify a polars dtype into the closed profiling type set.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => Self::Numeric,
            DataType::Date | DataType::Datetime(_, _) | DataType::Time => Self::Temporal,
            _ => Self::Text,
        }
    }
}

/// Type-dependent statistics for one column.
///
/// Exactly one variant is populated per column, selected by the column's
/// [`ColumnType`]. Aggregates are `None` (absent, not zero) when every value
/// in the column is null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mean: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        median: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        std: Option<f64>,
    },
    Text {
        /// Average string length over non-null values.
        #[serde(skip_serializing_if = "Option::is_none")]
        avg_length: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        /// Up to the first 3 non-null values, in encounter order.
        sample_values: Vec<String>,
    },
    Temporal {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
}

impl ColumnStats {
    /// Check that the stat set matches the detected column type.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Self::Numeric { .. }, ColumnType::Numeric)
                | (Self::Text { .. }, ColumnType::Text)
                | (Self::Temporal { .. }, ColumnType::Temporal)
        )
    }
}

/// Derived, read-only summary of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// The raw polars dtype, for display.
    pub dtype: String,
    pub column_type: ColumnType,
    pub null_count: usize,
    /// Percentage in [0, 100]; 0 for empty tables.
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Percentage in [0, 100]; 0 for empty tables.
    pub unique_percentage: f64,
    pub stats: ColumnStats,
}

/// Whole-table aggregate statistics, computed once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicStats {
    pub row_count: usize,
    pub column_count: usize,
    /// Estimated in-memory footprint of the table, in megabytes.
    pub memory_usage_mb: f64,
    /// Rows that are exact duplicates of an earlier row (full-row equality).
    pub duplicate_rows: usize,
    pub total_nulls: usize,
    /// Percentage in [0, 100]; 0 when the table has no cells.
    pub null_percentage: f64,
}

/// Ordinal urgency tag for a quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Uppercase label for prompt and log formatting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

/// A single data-quality finding.
///
/// Findings are independent; one column may accumulate issues from several
/// rules in the same run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub issue_type: String,
    /// Absent for table-level findings such as duplicate rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub description: String,
    pub recommendation: String,
}

/// Result of LLM insight generation, including the degraded case.
///
/// When every model candidate fails, `insights` holds a placeholder and
/// `error` carries the router's failure text; the report as a whole still
/// succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmInsight {
    pub insights: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LlmInsight {
    /// Build the degraded placeholder insight from a router failure.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            insights: "LLM insights unavailable".to_string(),
            model_used: None,
            tokens_used: None,
            error: Some(error.into()),
        }
    }
}

/// The complete profiling report returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub file_name: String,
    /// ISO-8601 timestamp of report generation.
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_stats: Option<BasicStats>,
    pub columns: Vec<ColumnProfile>,
    pub quality_issues: Vec<QualityIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_insights: Option<LlmInsight>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileReport {
    /// Build the bare failure report for catastrophic load/parse errors.
    pub fn failure(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            generated_at: chrono::Local::now().to_rfc3339(),
            basic_stats: None,
            columns: Vec::new(),
            quality_issues: Vec::new(),
            llm_insights: None,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// One model in the pricing table: identifier plus cost per 1M tokens.
///
/// Used only for post-hoc cost estimation, never for routing decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCandidate {
    pub model: String,
    pub input_cost_per_million: f64,
    pub output_cost_per_million: f64,
}

impl ModelCandidate {
    pub fn new(model: impl Into<String>, input: f64, output: f64) -> Self {
        Self {
            model: model.into(),
            input_cost_per_million: input,
            output_cost_per_million: output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_from_dtype() {
        assert_eq!(
            ColumnType::from_dtype(&DataType::Int64),
            ColumnType::Numeric
        );
        assert_eq!(
            ColumnType::from_dtype(&DataType::Float32),
            ColumnType::Numeric
        );
        assert_eq!(ColumnType::from_dtype(&DataType::Date), ColumnType::Temporal);
        assert_eq!(ColumnType::from_dtype(&DataType::String), ColumnType::Text);
        // Booleans are treated as text, not numeric
        assert_eq!(ColumnType::from_dtype(&DataType::Boolean), ColumnType::Text);
    }

    #[test]
    fn test_stats_matches_type() {
        let stats = ColumnStats::Numeric {
            min: None,
            max: None,
            mean: None,
            median: None,
            std: None,
        };
        assert!(stats.matches(ColumnType::Numeric));
        assert!(!stats.matches(ColumnType::Text));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Severity::Info).unwrap(), "\"info\"");
    }

    #[test]
    fn test_unavailable_insight() {
        let insight = LlmInsight::unavailable("all candidates failed");
        assert_eq!(insight.insights, "LLM insights unavailable");
        assert!(insight.model_used.is_none());
        assert_eq!(insight.error.as_deref(), Some("all candidates failed"));
    }

    #[test]
    fn test_failure_report_shape() {
        let report = ProfileReport::failure("broken.csv", "bad header");
        assert!(!report.success);
        assert!(report.basic_stats.is_none());
        assert!(report.columns.is_empty());
        assert_eq!(report.error.as_deref(), Some("bad header"));
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = ProfileReport {
            file_name: "data.csv".to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            basic_stats: Some(BasicStats {
                row_count: 4,
                column_count: 2,
                memory_usage_mb: 0.1,
                duplicate_rows: 1,
                total_nulls: 1,
                null_percentage: 12.5,
            }),
            columns: Vec::new(),
            quality_issues: vec![QualityIssue {
                severity: Severity::Medium,
                issue_type: "duplicate_rows".to_string(),
                column: None,
                description: "Found 1 duplicate rows (25.0%)".to_string(),
                recommendation: "Review and remove duplicate entries".to_string(),
            }],
            llm_insights: None,
            success: true,
            error: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: ProfileReport = serde_json::from_str(&json).unwrap();
        assert!(back.success);
        assert_eq!(back.basic_stats.unwrap().duplicate_rows, 1);
        assert_eq!(back.quality_issues.len(), 1);
        // Table-level issue omits the column field entirely
        assert!(!json.contains("\"column\""));
    }
}

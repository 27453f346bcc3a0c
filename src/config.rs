//! Configuration types for the profiling pipeline.
//!
//! Quality-rule thresholds and prompt caps live here as configurable
//! constants with the defaults the heuristics were tuned for. Use the
//! builder for partial overrides.

use serde::{Deserialize, Serialize};

/// Configuration for the profiling pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use tablescope::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .high_null_threshold(60.0)
///     .sample_rows(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Null percentage above which a column is flagged `high`.
    /// Default: 50.0
    pub high_null_threshold: f64,

    /// Null percentage above which a column is flagged `medium`.
    /// Default: 20.0
    pub medium_null_threshold: f64,

    /// Unique-value percentage below which a text column is flagged as
    /// low-cardinality (constant columns excluded).
    /// Default: 1.0
    pub low_cardinality_threshold: f64,

    /// Unique-value percentage above which a column is flagged as a
    /// potential identifier.
    /// Default: 95.0
    pub identifier_threshold: f64,

    /// Number of raw rows sampled for the insight prompt.
    /// Default: 5 (the prompt itself embeds at most `max_prompt_rows`)
    pub sample_rows: usize,

    /// Maximum columns summarized in the insight prompt.
    /// Default: 10
    pub max_prompt_columns: usize,

    /// Maximum quality issues listed in the insight prompt.
    /// Default: 5
    pub max_prompt_issues: usize,

    /// Maximum sample rows embedded in the insight prompt.
    /// Default: 3
    pub max_prompt_rows: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            high_null_threshold: 50.0,
            medium_null_threshold: 20.0,
            low_cardinality_threshold: 1.0,
            identifier_threshold: 95.0,
            sample_rows: 5,
            max_prompt_columns: 10,
            max_prompt_issues: 5,
            max_prompt_rows: 3,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("high_null_threshold", self.high_null_threshold),
            ("medium_null_threshold", self.medium_null_threshold),
            ("low_cardinality_threshold", self.low_cardinality_threshold),
            ("identifier_threshold", self.identifier_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.medium_null_threshold > self.high_null_threshold {
            return Err(ConfigValidationError::ThresholdOrdering);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 100.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("medium_null_threshold must not exceed high_null_threshold")]
    ThresholdOrdering,
}

/// Builder for [`ProfilerConfig`].
#[derive(Default)]
pub struct ProfilerConfigBuilder {
    high_null_threshold: Option<f64>,
    medium_null_threshold: Option<f64>,
    low_cardinality_threshold: Option<f64>,
    identifier_threshold: Option<f64>,
    sample_rows: Option<usize>,
    max_prompt_columns: Option<usize>,
    max_prompt_issues: Option<usize>,
    max_prompt_rows: Option<usize>,
}

impl ProfilerConfigBuilder {
    /// Set the high-severity null threshold (percentage).
    pub fn high_null_threshold(mut self, value: f64) -> Self {
        self.high_null_threshold = Some(value);
        self
    }

    /// Set the medium-severity null threshold (percentage).
    pub fn medium_null_threshold(mut self, value: f64) -> Self {
        self.medium_null_threshold = Some(value);
        self
    }

    /// Set the low-cardinality threshold (percentage).
    pub fn low_cardinality_threshold(mut self, value: f64) -> Self {
        self.low_cardinality_threshold = Some(value);
        self
    }

    /// Set the potential-identifier threshold (percentage).
    pub fn identifier_threshold(mut self, value: f64) -> Self {
        self.identifier_threshold = Some(value);
        self
    }

    /// Set the number of raw rows sampled for the prompt.
    pub fn sample_rows(mut self, value: usize) -> Self {
        self.sample_rows = Some(value);
        self
    }

    /// Set the maximum columns summarized in the prompt.
    pub fn max_prompt_columns(mut self, value: usize) -> Self {
        self.max_prompt_columns = Some(value);
        self
    }

    /// Set the maximum issues listed in the prompt.
    pub fn max_prompt_issues(mut self, value: usize) -> Self {
        self.max_prompt_issues = Some(value);
        self
    }

    /// Set the maximum sample rows embedded in the prompt.
    pub fn max_prompt_rows(mut self, value: usize) -> Self {
        self.max_prompt_rows = Some(value);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let defaults = ProfilerConfig::default();
        let config = ProfilerConfig {
            high_null_threshold: self.high_null_threshold.unwrap_or(defaults.high_null_threshold),
            medium_null_threshold: self
                .medium_null_threshold
                .unwrap_or(defaults.medium_null_threshold),
            low_cardinality_threshold: self
                .low_cardinality_threshold
                .unwrap_or(defaults.low_cardinality_threshold),
            identifier_threshold: self
                .identifier_threshold
                .unwrap_or(defaults.identifier_threshold),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            max_prompt_columns: self.max_prompt_columns.unwrap_or(defaults.max_prompt_columns),
            max_prompt_issues: self.max_prompt_issues.unwrap_or(defaults.max_prompt_issues),
            max_prompt_rows: self.max_prompt_rows.unwrap_or(defaults.max_prompt_rows),
        };
        config.validate()?;
        Ok(config)
    }
}

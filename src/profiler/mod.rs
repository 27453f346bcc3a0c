//! Dataset profiling: whole-table aggregates and per-column summaries.
//!
//! [`DataProfiler::profile_dataset`] is deterministic and side-effect free;
//! [`DataProfiler::profile_file`] is the full pipeline entry point that also
//! runs quality analysis and optional LLM insight generation.

mod statistics;

use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::insight::InsightSynthesizer;
use crate::loader::DatasetLoader;
use crate::quality::DataQualityAnalyzer;
use crate::types::{BasicStats, ColumnProfile, ColumnStats, ColumnType, ProfileReport};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

pub(crate) use statistics::{numeric_stats, temporal_stats, text_stats};

/// Profiler for computing table and column statistics.
pub struct DataProfiler {
    config: ProfilerConfig,
}

impl Default for DataProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProfiler {
    /// Create a profiler with default thresholds.
    pub fn new() -> Self {
        Self {
            config: ProfilerConfig::default(),
        }
    }

    /// Create a profiler with a custom configuration.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile an in-memory table: whole-table aggregates plus one profile
    /// per column, in column order.
    pub fn profile_dataset(&self, df: &DataFrame) -> Result<(BasicStats, Vec<ColumnProfile>)> {
        let basic_stats = Self::basic_stats(df)?;

        let mut columns = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            columns.push(Self::profile_column(df, col_name)?);
        }

        Ok((basic_stats, columns))
    }

    fn basic_stats(df: &DataFrame) -> Result<BasicStats> {
        let row_count = df.height();
        let column_count = df.width();

        let duplicate_rows = if row_count > 0 && column_count > 0 {
            row_count
                - df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
                    .height()
        } else {
            0
        };

        let total_nulls: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
        let cell_count = row_count * column_count;
        let null_percentage = if cell_count > 0 {
            (total_nulls as f64 / cell_count as f64) * 100.0
        } else {
            0.0
        };

        Ok(BasicStats {
            row_count,
            column_count,
            memory_usage_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
            duplicate_rows,
            total_nulls,
            null_percentage,
        })
    }

    fn profile_column(df: &DataFrame, col_name: &PlSmallStr) -> Result<ColumnProfile> {
        let col = df.column(col_name)?;
        let series = col.as_materialized_series();
        let row_count = df.height();

        let column_type = ColumnType::from_dtype(series.dtype());
        let null_count = series.null_count();
        // Uniqueness over non-null values only; an all-null column has 0
        let unique_count = series.drop_nulls().n_unique()?;

        let (null_percentage, unique_percentage) = if row_count > 0 {
            (
                (null_count as f64 / row_count as f64) * 100.0,
                (unique_count as f64 / row_count as f64) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        let stats = Self::column_stats(series, column_type)?;
        debug_assert!(stats.matches(column_type));

        Ok(ColumnProfile {
            name: col_name.to_string(),
            dtype: format!("{:?}", series.dtype()),
            column_type,
            null_count,
            null_percentage,
            unique_count,
            unique_percentage,
            stats,
        })
    }

    fn column_stats(series: &Series, column_type: ColumnType) -> Result<ColumnStats> {
        match column_type {
            ColumnType::Numeric => numeric_stats(series),
            ColumnType::Text => text_stats(series),
            ColumnType::Temporal => temporal_stats(series),
        }
    }

    /// Render the first `sample_rows` rows as JSON objects for prompting.
    pub fn sample_rows(&self, df: &DataFrame) -> Result<Vec<serde_json::Value>> {
        let head = df.head(Some(self.config.sample_rows));
        let names = head.get_column_names();
        let mut rows = Vec::with_capacity(head.height());

        for row_idx in 0..head.height() {
            let mut row = serde_json::Map::with_capacity(names.len());
            for (col_idx, col) in head.get_columns().iter().enumerate() {
                let value = col.get(row_idx)?;
                row.insert(names[col_idx].to_string(), any_value_to_json(&value));
            }
            rows.push(serde_json::Value::Object(row));
        }

        Ok(rows)
    }

    /// Run the full pipeline on one file: load, profile, quality-check, and
    /// (when a synthesizer is supplied) generate LLM insights.
    ///
    /// Load and statistics failures never panic or propagate: they produce a
    /// `success: false` report carrying the error message.
    pub fn profile_file(
        &self,
        path: &Path,
        file_name: &str,
        synthesizer: Option<&InsightSynthesizer>,
    ) -> ProfileReport {
        match self.try_profile_file(path, file_name, synthesizer) {
            Ok(report) => report,
            Err(e) => {
                warn!("Profiling failed for '{}': {}", file_name, e);
                ProfileReport::failure(file_name, e.to_string())
            }
        }
    }

    fn try_profile_file(
        &self,
        path: &Path,
        file_name: &str,
        synthesizer: Option<&InsightSynthesizer>,
    ) -> Result<ProfileReport> {
        let df = DatasetLoader::load(path, file_name)?;
        info!(
            "Loaded '{}': {} rows x {} columns",
            file_name,
            df.height(),
            df.width()
        );

        let (basic_stats, columns) = self.profile_dataset(&df)?;
        let analyzer = DataQualityAnalyzer::new(self.config.clone());
        let quality_issues = analyzer.identify_issues(&basic_stats, &columns);

        let llm_insights = match synthesizer {
            Some(synth) => {
                let rows = self.sample_rows(&df)?;
                Some(synth.generate(&basic_stats, &columns, &quality_issues, &rows))
            }
            None => None,
        };

        Ok(ProfileReport {
            file_name: file_name.to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            basic_stats: Some(basic_stats),
            columns,
            quality_issues,
            llm_insights,
            success: true,
            error: None,
        })
    }
}

fn any_value_to_json(value: &AnyValue) -> serde_json::Value {
    match value {
        AnyValue::Null => serde_json::Value::Null,
        AnyValue::Boolean(b) => serde_json::json!(b),
        AnyValue::Int8(v) => serde_json::json!(v),
        AnyValue::Int16(v) => serde_json::json!(v),
        AnyValue::Int32(v) => serde_json::json!(v),
        AnyValue::Int64(v) => serde_json::json!(v),
        AnyValue::UInt8(v) => serde_json::json!(v),
        AnyValue::UInt16(v) => serde_json::json!(v),
        AnyValue::UInt32(v) => serde_json::json!(v),
        AnyValue::UInt64(v) => serde_json::json!(v),
        AnyValue::Float32(v) => serde_json::json!(v),
        AnyValue::Float64(v) => serde_json::json!(v),
        AnyValue::String(s) => serde_json::json!(s),
        AnyValue::StringOwned(s) => serde_json::json!(s.as_str()),
        // Dates, times, and anything exotic render through Display
        other => serde_json::json!(format!("{}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample_frame() -> DataFrame {
        df!(
            "a" => [Some(1i64), Some(2), Some(2), None],
            "b" => ["x", "y", "y", "z"],
        )
        .unwrap()
    }

    #[test]
    fn test_basic_stats_counts() {
        let df = sample_frame();
        let profiler = DataProfiler::new();
        let (stats, _) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(stats.row_count, 4);
        assert_eq!(stats.column_count, 2);
        assert_eq!(stats.total_nulls, 1);
        // 1 null out of 8 cells
        assert!((stats.null_percentage - 12.5).abs() < 1e-9);
        assert!(stats.memory_usage_mb > 0.0);
    }

    #[test]
    fn test_duplicate_row_detection() {
        let df = df!(
            "a" => [1i64, 2, 2, 1],
            "b" => ["x", "y", "y", "x"],
        )
        .unwrap();
        let profiler = DataProfiler::new();
        let (stats, _) = profiler.profile_dataset(&df).unwrap();

        // Rows 3 and 4 duplicate rows 2 and 1
        assert_eq!(stats.duplicate_rows, 2);
    }

    #[test]
    fn test_duplicate_count_invariant_under_row_order() {
        let forward = df!(
            "a" => [1i64, 2, 2, 1, 3],
            "b" => ["x", "y", "y", "x", "z"],
        )
        .unwrap();
        let shuffled = df!(
            "a" => [3i64, 2, 1, 2, 1],
            "b" => ["z", "y", "x", "y", "x"],
        )
        .unwrap();
        let profiler = DataProfiler::new();

        let (forward_stats, _) = profiler.profile_dataset(&forward).unwrap();
        let (shuffled_stats, _) = profiler.profile_dataset(&shuffled).unwrap();
        assert_eq!(forward_stats.duplicate_rows, 2);
        assert_eq!(forward_stats.duplicate_rows, shuffled_stats.duplicate_rows);
    }

    #[test]
    fn test_unique_count_excludes_nulls() {
        let df = df!(
            "a" => [Some(1i64), Some(2), Some(2), None],
        )
        .unwrap();
        let profiler = DataProfiler::new();
        let (_, columns) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(columns[0].unique_count, 2);
        assert_eq!(columns[0].unique_percentage, 50.0);
    }

    #[test]
    fn test_all_null_column_has_zero_unique() {
        let df = df!(
            "id" => [1i64, 2, 3, 4],
            "empty" => [None::<&str>, None, None, None],
        )
        .unwrap();
        let profiler = DataProfiler::new();
        let (_, columns) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(columns[1].unique_count, 0);
        assert_eq!(columns[1].unique_percentage, 0.0);
        assert_eq!(columns[1].null_percentage, 100.0);
    }

    #[test]
    fn test_empty_frame_guards() {
        let df = DataFrame::empty();
        let profiler = DataProfiler::new();
        let (stats, columns) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(stats.row_count, 0);
        assert_eq!(stats.duplicate_rows, 0);
        assert_eq!(stats.null_percentage, 0.0);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_zero_row_frame_percentages() {
        let df = df!(
            "a" => Vec::<i64>::new(),
        )
        .unwrap();
        let profiler = DataProfiler::new();
        let (stats, columns) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(stats.null_percentage, 0.0);
        assert_eq!(columns[0].null_percentage, 0.0);
        assert_eq!(columns[0].unique_percentage, 0.0);
    }

    #[test]
    fn test_column_profiles_typed() {
        let df = sample_frame();
        let profiler = DataProfiler::new();
        let (_, columns) = profiler.profile_dataset(&df).unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "a");
        assert_eq!(columns[0].column_type, ColumnType::Numeric);
        assert_eq!(columns[0].null_count, 1);
        assert_eq!(columns[0].unique_count, 2); // null is not a value
        assert!(columns[0].stats.matches(ColumnType::Numeric));

        assert_eq!(columns[1].column_type, ColumnType::Text);
        assert!(columns[1].stats.matches(ColumnType::Text));
    }

    #[test]
    fn test_sample_rows_json() {
        let df = sample_frame();
        let profiler = DataProfiler::new();
        let rows = profiler.sample_rows(&df).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["a"], serde_json::json!(1));
        assert_eq!(rows[0]["b"], serde_json::json!("x"));
        // Nulls come through as JSON null
        assert_eq!(rows[3]["a"], serde_json::Value::Null);
    }

    #[test]
    fn test_sample_rows_capped() {
        let df = df!(
            "a" => (0..20i64).collect::<Vec<_>>(),
        )
        .unwrap();
        let profiler = DataProfiler::new();
        let rows = profiler.sample_rows(&df).unwrap();
        assert_eq!(rows.len(), 5);
    }
}

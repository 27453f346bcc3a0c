//! Per-column statistical analysis.
//!
//! Each function computes the stat set for one [`ColumnType`] variant.
//! Aggregates come back as `None` when the column has no non-null values.

use crate::error::Result;
use crate::types::ColumnStats;
use polars::prelude::*;

/// Number of sample values captured for text columns.
const TEXT_SAMPLE_COUNT: usize = 3;

/// Compute numeric statistics: min, max, mean, median, sample std.
pub(crate) fn numeric_stats(series: &Series) -> Result<ColumnStats> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(ColumnStats::Numeric {
            min: None,
            max: None,
            mean: None,
            median: None,
            std: None,
        });
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let sorted = float_series.sort(SortOptions::default())?;
    let n = sorted.len();

    let min = sorted.get(0)?.try_extract::<f64>().ok();
    let max = sorted.get(n - 1)?.try_extract::<f64>().ok();
    let mean = float_series.mean();
    let median = median_of_sorted(&sorted, n)?;
    let std = Some(calculate_std(&float_series)?);

    Ok(ColumnStats::Numeric {
        min,
        max,
        mean,
        median,
        std,
    })
}

fn median_of_sorted(sorted: &Series, n: usize) -> Result<Option<f64>> {
    let mid = sorted.get(n / 2)?.try_extract::<f64>().ok();
    if n % 2 == 1 {
        return Ok(mid);
    }
    let lower = sorted.get(n / 2 - 1)?.try_extract::<f64>().ok();
    Ok(match (lower, mid) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        _ => None,
    })
}

/// Sample standard deviation (n - 1 denominator) of an all-f64 series.
pub(crate) fn calculate_std(series: &Series) -> Result<f64> {
    let mean = series.mean().unwrap_or(0.0);
    let n = series.len() as f64;

    if n <= 1.0 {
        return Ok(0.0);
    }

    let float_series = series.f64()?;
    let variance: f64 = float_series
        .into_iter()
        .filter_map(|v| v.map(|val| (val - mean).powi(2)))
        .sum::<f64>()
        / (n - 1.0);

    Ok(variance.sqrt())
}

/// Compute text statistics: length aggregates over non-null values plus the
/// first few non-null values, in encounter order, as samples.
pub(crate) fn text_stats(series: &Series) -> Result<ColumnStats> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(ColumnStats::Text {
            avg_length: None,
            min_length: None,
            max_length: None,
            sample_values: Vec::new(),
        });
    }

    // Booleans and other non-string dtypes classified as text get rendered
    let string_series = non_null.cast(&DataType::String)?;
    let chunked = string_series.str()?;

    let mut total_length = 0usize;
    let mut min_length = usize::MAX;
    let mut max_length = 0usize;
    let mut count = 0usize;
    let mut sample_values = Vec::new();

    for value in chunked.into_iter().flatten() {
        let length = value.chars().count();
        total_length += length;
        min_length = min_length.min(length);
        max_length = max_length.max(length);
        count += 1;

        if sample_values.len() < TEXT_SAMPLE_COUNT {
            sample_values.push(value.to_string());
        }
    }

    if count == 0 {
        return Ok(ColumnStats::Text {
            avg_length: None,
            min_length: None,
            max_length: None,
            sample_values,
        });
    }

    Ok(ColumnStats::Text {
        avg_length: Some(total_length as f64 / count as f64),
        min_length: Some(min_length),
        max_length: Some(max_length),
        sample_values,
    })
}

/// Compute temporal statistics: formatted min and max.
pub(crate) fn temporal_stats(series: &Series) -> Result<ColumnStats> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(ColumnStats::Temporal {
            min: None,
            max: None,
        });
    }

    let sorted = non_null.sort(SortOptions::default())?;
    let n = sorted.len();
    let min = Some(format!("{}", sorted.get(0)?));
    let max = Some(format!("{}", sorted.get(n - 1)?));

    Ok(ColumnStats::Temporal { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== numeric_stats tests ====================

    #[test]
    fn test_numeric_stats_basic() {
        let series = Series::new("val".into(), &[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let stats = numeric_stats(&series).unwrap();
        match stats {
            ColumnStats::Numeric {
                min,
                max,
                mean,
                median,
                std,
            } => {
                assert_eq!(min, Some(1.0));
                assert_eq!(max, Some(5.0));
                assert_eq!(mean, Some(3.0));
                assert_eq!(median, Some(3.0));
                // Sample std of 1..5 is sqrt(2.5)
                assert!((std.unwrap() - 2.5f64.sqrt()).abs() < 1e-9);
            }
            _ => panic!("expected numeric stats"),
        }
    }

    #[test]
    fn test_numeric_stats_even_count_median() {
        let series = Series::new("val".into(), &[1.0f64, 2.0, 3.0, 4.0]);
        let stats = numeric_stats(&series).unwrap();
        match stats {
            ColumnStats::Numeric { median, .. } => assert_eq!(median, Some(2.5)),
            _ => panic!("expected numeric stats"),
        }
    }

    #[test]
    fn test_numeric_stats_ignores_nulls() {
        let series = Series::new("val".into(), &[Some(10.0f64), None, Some(20.0)]);
        let stats = numeric_stats(&series).unwrap();
        match stats {
            ColumnStats::Numeric { min, max, mean, .. } => {
                assert_eq!(min, Some(10.0));
                assert_eq!(max, Some(20.0));
                assert_eq!(mean, Some(15.0));
            }
            _ => panic!("expected numeric stats"),
        }
    }

    #[test]
    fn test_numeric_stats_all_null() {
        let series = Series::new("val".into(), &[None::<f64>, None, None]);
        let stats = numeric_stats(&series).unwrap();
        match stats {
            ColumnStats::Numeric {
                min,
                max,
                mean,
                median,
                std,
            } => {
                assert!(min.is_none());
                assert!(max.is_none());
                assert!(mean.is_none());
                assert!(median.is_none());
                assert!(std.is_none());
            }
            _ => panic!("expected numeric stats"),
        }
    }

    #[test]
    fn test_numeric_stats_integer_column() {
        let series = Series::new("val".into(), &[3i64, 1, 2]);
        let stats = numeric_stats(&series).unwrap();
        match stats {
            ColumnStats::Numeric { min, max, median, .. } => {
                assert_eq!(min, Some(1.0));
                assert_eq!(max, Some(3.0));
                assert_eq!(median, Some(2.0));
            }
            _ => panic!("expected numeric stats"),
        }
    }

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_single_value() {
        let series = Series::new("val".into(), &[5.0f64]);
        assert_eq!(calculate_std(&series).unwrap(), 0.0);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        let series = Series::new("val".into(), &[5.0f64, 5.0, 5.0, 5.0]);
        assert_eq!(calculate_std(&series).unwrap(), 0.0);
    }

    // ==================== text_stats tests ====================

    #[test]
    fn test_text_stats_lengths_and_samples() {
        let series = Series::new("name".into(), &["ab", "abcd", "a", "xyz", "pq"]);
        let stats = text_stats(&series).unwrap();
        match stats {
            ColumnStats::Text {
                avg_length,
                min_length,
                max_length,
                sample_values,
            } => {
                assert_eq!(min_length, Some(1));
                assert_eq!(max_length, Some(4));
                assert!((avg_length.unwrap() - 2.4).abs() < 1e-9);
                // First three non-null values, in encounter order
                assert_eq!(sample_values, vec!["ab", "abcd", "a"]);
            }
            _ => panic!("expected text stats"),
        }
    }

    #[test]
    fn test_text_stats_skips_nulls_in_samples() {
        let series = Series::new("name".into(), &[None, Some("x"), None, Some("y")]);
        let stats = text_stats(&series).unwrap();
        match stats {
            ColumnStats::Text { sample_values, .. } => {
                assert_eq!(sample_values, vec!["x", "y"]);
            }
            _ => panic!("expected text stats"),
        }
    }

    #[test]
    fn test_text_stats_all_null() {
        let series = Series::new("name".into(), &[None::<&str>, None]);
        let stats = text_stats(&series).unwrap();
        match stats {
            ColumnStats::Text {
                avg_length,
                min_length,
                max_length,
                sample_values,
            } => {
                assert!(avg_length.is_none());
                assert!(min_length.is_none());
                assert!(max_length.is_none());
                assert!(sample_values.is_empty());
            }
            _ => panic!("expected text stats"),
        }
    }

    // ==================== temporal_stats tests ====================

    #[test]
    fn test_temporal_stats_min_max() {
        let series = Series::new("day".into(), &[20i32, 5, 12])
            .cast(&DataType::Date)
            .unwrap();
        let stats = temporal_stats(&series).unwrap();
        match stats {
            ColumnStats::Temporal { min, max } => {
                // Days since epoch: 5 -> 1970-01-06, 20 -> 1970-01-21
                assert_eq!(min.as_deref(), Some("1970-01-06"));
                assert_eq!(max.as_deref(), Some("1970-01-21"));
            }
            _ => panic!("expected temporal stats"),
        }
    }

    #[test]
    fn test_temporal_stats_all_null() {
        let series = Series::new("day".into(), &[None::<i32>, None])
            .cast(&DataType::Date)
            .unwrap();
        let stats = temporal_stats(&series).unwrap();
        match stats {
            ColumnStats::Temporal { min, max } => {
                assert!(min.is_none());
                assert!(max.is_none());
            }
            _ => panic!("expected temporal stats"),
        }
    }
}

//! Quality rules applied to profiling output.
//!
//! The analyzer consumes the statistics engine's results and never touches
//! the raw table. Rules run in a fixed order and are independent: one column
//! can accumulate findings from several rules in the same pass.

use crate::config::ProfilerConfig;
use crate::types::{BasicStats, ColumnProfile, ColumnType, QualityIssue, Severity};
use tracing::debug;

/// Rule-based analyzer producing [`QualityIssue`]s from profiles.
pub struct DataQualityAnalyzer {
    config: ProfilerConfig,
}

impl Default for DataQualityAnalyzer {
    fn default() -> Self {
        Self::new(ProfilerConfig::default())
    }
}

impl DataQualityAnalyzer {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    /// Run every rule over the computed stats and profiles.
    ///
    /// Emission order: per-column null findings, table-level duplicates,
    /// low-cardinality text columns, potential identifiers.
    pub fn identify_issues(
        &self,
        basic_stats: &BasicStats,
        columns: &[ColumnProfile],
    ) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        self.check_null_percentages(columns, &mut issues);
        self.check_duplicate_rows(basic_stats, &mut issues);
        self.check_low_cardinality(columns, &mut issues);
        self.check_potential_identifiers(columns, &mut issues);

        debug!("Quality analysis found {} issue(s)", issues.len());
        issues
    }

    fn check_null_percentages(&self, columns: &[ColumnProfile], issues: &mut Vec<QualityIssue>) {
        for column in columns {
            let severity = if column.null_percentage > self.config.high_null_threshold {
                Severity::High
            } else if column.null_percentage > self.config.medium_null_threshold {
                Severity::Medium
            } else {
                continue;
            };

            issues.push(QualityIssue {
                severity,
                issue_type: "high_null_percentage".to_string(),
                column: Some(column.name.clone()),
                description: format!(
                    "Column '{}' has {:.1}% missing values",
                    column.name, column.null_percentage
                ),
                recommendation: "Consider dropping this column or imputing values".to_string(),
            });
        }
    }

    fn check_duplicate_rows(&self, basic_stats: &BasicStats, issues: &mut Vec<QualityIssue>) {
        if basic_stats.duplicate_rows == 0 {
            return;
        }

        let percentage = if basic_stats.row_count > 0 {
            (basic_stats.duplicate_rows as f64 / basic_stats.row_count as f64) * 100.0
        } else {
            0.0
        };

        issues.push(QualityIssue {
            severity: Severity::Medium,
            issue_type: "duplicate_rows".to_string(),
            column: None,
            description: format!(
                "Found {} duplicate rows ({:.1}%)",
                basic_stats.duplicate_rows, percentage
            ),
            recommendation: "Review and remove duplicate entries".to_string(),
        });
    }

    fn check_low_cardinality(&self, columns: &[ColumnProfile], issues: &mut Vec<QualityIssue>) {
        for column in columns {
            // Constant columns are excluded: a single repeated value is a
            // different problem than an unexploited categorical.
            if column.column_type == ColumnType::Text
                && column.unique_percentage < self.config.low_cardinality_threshold
                && column.unique_count > 1
            {
                issues.push(QualityIssue {
                    severity: Severity::Low,
                    issue_type: "low_cardinality".to_string(),
                    column: Some(column.name.clone()),
                    description: format!(
                        "Column '{}' has only {} unique values",
                        column.name, column.unique_count
                    ),
                    recommendation: "Consider converting to categorical type".to_string(),
                });
            }
        }
    }

    fn check_potential_identifiers(&self, columns: &[ColumnProfile], issues: &mut Vec<QualityIssue>) {
        for column in columns {
            if column.unique_percentage > self.config.identifier_threshold {
                issues.push(QualityIssue {
                    severity: Severity::Info,
                    issue_type: "potential_id_column".to_string(),
                    column: Some(column.name.clone()),
                    description: format!(
                        "Column '{}' appears to be a unique identifier ({:.1}% unique)",
                        column.name, column.unique_percentage
                    ),
                    recommendation: "Use as primary key or index".to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnStats;

    fn text_column(name: &str, rows: usize, nulls: usize, unique: usize) -> ColumnProfile {
        let null_percentage = if rows > 0 {
            nulls as f64 / rows as f64 * 100.0
        } else {
            0.0
        };
        let unique_percentage = if rows > 0 {
            unique as f64 / rows as f64 * 100.0
        } else {
            0.0
        };
        ColumnProfile {
            name: name.to_string(),
            dtype: "String".to_string(),
            column_type: ColumnType::Text,
            null_count: nulls,
            null_percentage,
            unique_count: unique,
            unique_percentage,
            stats: ColumnStats::Text {
                avg_length: None,
                min_length: None,
                max_length: None,
                sample_values: Vec::new(),
            },
        }
    }

    fn stats(rows: usize, duplicates: usize) -> BasicStats {
        BasicStats {
            row_count: rows,
            column_count: 1,
            memory_usage_mb: 0.0,
            duplicate_rows: duplicates,
            total_nulls: 0,
            null_percentage: 0.0,
        }
    }

    #[test]
    fn test_high_null_severity() {
        let analyzer = DataQualityAnalyzer::default();
        let columns = vec![text_column("mostly_empty", 100, 60, 5)];
        let issues = analyzer.identify_issues(&stats(100, 0), &columns);

        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].issue_type, "high_null_percentage");
        assert_eq!(issues[0].column.as_deref(), Some("mostly_empty"));
        assert!(issues[0].description.contains("60.0%"));
    }

    #[test]
    fn test_medium_null_severity() {
        let analyzer = DataQualityAnalyzer::default();
        let columns = vec![text_column("patchy", 100, 30, 40)];
        let issues = analyzer.identify_issues(&stats(100, 0), &columns);

        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_null_threshold_not_met() {
        let analyzer = DataQualityAnalyzer::default();
        // Exactly 20% is not "more than 20%"
        let columns = vec![text_column("fine", 100, 20, 40)];
        let issues = analyzer.identify_issues(&stats(100, 0), &columns);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_duplicate_rows_issue() {
        let analyzer = DataQualityAnalyzer::default();
        let issues = analyzer.identify_issues(&stats(100, 25), &[]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].issue_type, "duplicate_rows");
        assert!(issues[0].column.is_none());
        assert!(issues[0].description.contains("25 duplicate rows (25.0%)"));
    }

    #[test]
    fn test_no_duplicates_no_issue() {
        let analyzer = DataQualityAnalyzer::default();
        let issues = analyzer.identify_issues(&stats(100, 0), &[]);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_low_cardinality_flagged() {
        let analyzer = DataQualityAnalyzer::default();
        // 3 unique values in 1000 rows: 0.3% < 1%
        let columns = vec![text_column("category", 1000, 0, 3)];
        let issues = analyzer.identify_issues(&stats(1000, 0), &columns);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Low);
        assert_eq!(issues[0].issue_type, "low_cardinality");
        assert!(issues[0].description.contains("3 unique values"));
    }

    #[test]
    fn test_constant_column_excluded() {
        let analyzer = DataQualityAnalyzer::default();
        let columns = vec![text_column("constant", 1000, 0, 1)];
        let issues = analyzer.identify_issues(&stats(1000, 0), &columns);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_numeric_column_not_low_cardinality() {
        let analyzer = DataQualityAnalyzer::default();
        let mut column = text_column("code", 1000, 0, 3);
        column.column_type = ColumnType::Numeric;
        column.stats = ColumnStats::Numeric {
            min: None,
            max: None,
            mean: None,
            median: None,
            std: None,
        };
        let issues = analyzer.identify_issues(&stats(1000, 0), &[column]);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_potential_identifier() {
        let analyzer = DataQualityAnalyzer::default();
        let columns = vec![text_column("uuid", 100, 0, 100)];
        let issues = analyzer.identify_issues(&stats(100, 0), &columns);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].issue_type, "potential_id_column");
        assert_eq!(issues[0].recommendation, "Use as primary key or index");
    }

    #[test]
    fn test_column_accumulates_multiple_issues() {
        let analyzer = DataQualityAnalyzer::default();
        // 96% unique AND 25% null: identifier + medium null
        let columns = vec![text_column("sparse_id", 400, 100, 384)];
        let issues = analyzer.identify_issues(&stats(400, 0), &columns);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].issue_type, "high_null_percentage");
        assert_eq!(issues[1].issue_type, "potential_id_column");
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ProfilerConfig::builder()
            .high_null_threshold(90.0)
            .medium_null_threshold(70.0)
            .build()
            .unwrap();
        let analyzer = DataQualityAnalyzer::new(config);
        let columns = vec![text_column("patchy", 100, 60, 40)];
        let issues = analyzer.identify_issues(&stats(100, 0), &columns);
        // 60% nulls is below the raised medium threshold
        assert!(issues.is_empty());
    }
}

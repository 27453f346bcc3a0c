//! Heuristic data-quality analysis over computed profiles.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;

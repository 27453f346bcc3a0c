//! Dataset loading from the supported file formats.
//!
//! The loader sniffs the declared filename's extension against a fixed
//! allow-list and materializes the whole file into a [`DataFrame`]. There is
//! no chunked ingestion: files must fit in memory.

use crate::error::{ProfilerError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Extensions accepted by [`DatasetLoader::load`].
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".csv", ".xlsx", ".xls", ".json", ".parquet"];

/// Loader turning raw files into in-memory tables.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a data file into a [`DataFrame`].
    ///
    /// `file_name` is the declared filename used for extension sniffing; it
    /// may differ from `path` when the file was stored under an opaque
    /// upload identifier.
    ///
    /// # Errors
    ///
    /// [`ProfilerError::UnsupportedFormat`] when the extension is not in the
    /// allow-list, [`ProfilerError::Load`] when the content cannot be parsed.
    pub fn load(path: &Path, file_name: &str) -> Result<DataFrame> {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        debug!("Loading dataset: {} (as {})", path.display(), extension);

        match extension.as_str() {
            ".csv" => Self::load_csv(path, file_name),
            ".xlsx" | ".xls" => Self::load_excel(path, file_name),
            ".json" => Self::load_json(path, file_name),
            ".parquet" => Self::load_parquet(path, file_name),
            _ => Err(ProfilerError::UnsupportedFormat(extension)),
        }
    }

    fn load_csv(path: &Path, file_name: &str) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| Self::load_error(file_name, e))?
            .finish()
            .map_err(|e| Self::load_error(file_name, e))
    }

    fn load_json(path: &Path, file_name: &str) -> Result<DataFrame> {
        let file = File::open(path)?;
        JsonReader::new(file)
            .with_json_format(JsonFormat::Json)
            .finish()
            .map_err(|e| Self::load_error(file_name, e))
    }

    fn load_parquet(path: &Path, file_name: &str) -> Result<DataFrame> {
        let file = File::open(path)?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| Self::load_error(file_name, e))
    }

    /// Read the first worksheet: first row as header, then per-column
    /// inference (all-numeric becomes Float64, everything else String).
    fn load_excel(path: &Path, file_name: &str) -> Result<DataFrame> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| Self::load_error(file_name, e))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ProfilerError::Load {
                file: file_name.to_string(),
                reason: "workbook contains no worksheets".to_string(),
            })?
            .map_err(|e| Self::load_error(file_name, e))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| match cell {
                    Data::Empty => format!("column_{}", idx),
                    other => other.to_string(),
                })
                .collect(),
            None => {
                return Err(ProfilerError::Load {
                    file: file_name.to_string(),
                    reason: "worksheet is empty".to_string(),
                });
            }
        };

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut numerics: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
        let mut is_numeric: Vec<bool> = vec![true; headers.len()];

        for row in rows {
            for (idx, slot) in cells.iter_mut().enumerate() {
                let cell = row.get(idx).unwrap_or(&Data::Empty);
                match cell {
                    Data::Empty => {
                        slot.push(None);
                        numerics[idx].push(None);
                    }
                    other => {
                        let text = other.to_string();
                        match Self::cell_as_f64(other) {
                            Some(value) => numerics[idx].push(Some(value)),
                            None => {
                                is_numeric[idx] = false;
                                numerics[idx].push(None);
                            }
                        }
                        slot.push(Some(text));
                    }
                }
            }
        }

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if is_numeric[idx] && numerics[idx].iter().any(Option::is_some) {
                    Series::new(name.as_str().into(), &numerics[idx]).into_column()
                } else {
                    Series::new(name.as_str().into(), &cells[idx]).into_column()
                }
            })
            .collect();

        DataFrame::new(columns).map_err(|e| Self::load_error(file_name, e))
    }

    fn cell_as_f64(cell: &Data) -> Option<f64> {
        match cell {
            Data::Float(f) => Some(*f),
            Data::Int(i) => Some(*i as f64),
            Data::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn load_error(file_name: &str, error: impl std::fmt::Display) -> ProfilerError {
        ProfilerError::Load {
            file: file_name.to_string(),
            reason: error.to_string(),
        }
    }
}

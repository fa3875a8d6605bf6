//! Data loading utilities

use crate::error::{Result, SegmentError};
use crate::preprocessing::parsers::MISSING_MARKER;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Loader for raw processor tables.
///
/// Every column is read as text so that unit-bearing cells such as
/// `"65 W"` reach the parsers untouched.
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field separator
    delimiter: u8,
    /// Treat the literal missing marker as an empty cell
    missing_marker: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a comma-separated loader
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            missing_marker: true,
        }
    }

    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Keep `nan` cells as literal text instead of reading them as missing
    pub fn with_missing_marker(mut self, enabled: bool) -> Self {
        self.missing_marker = enabled;
        self
    }

    /// Load a delimited file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| SegmentError::DataError(format!("{}: {e}", path.display())))?;

        let mut parse_opts = CsvParseOptions::default().with_separator(self.delimiter);
        if self.missing_marker {
            parse_opts = parse_opts
                .with_null_values(Some(NullValues::AllColumnsSingle(MISSING_MARKER.into())));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()?;

        debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded CSV");
        Ok(df)
    }

    /// Header and row count of a delimited file without parsing its cells
    pub fn get_file_info(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let path = path.as_ref();
        let file_size = std::fs::metadata(path)?.len();
        let mut lines = BufReader::new(File::open(path)?).lines();

        let header = lines.next().transpose()?.unwrap_or_default();
        let separator = char::from(self.delimiter);
        let columns: Vec<String> = header
            .split(separator)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let n_rows = lines.count();

        Ok(FileInfo {
            path: path.display().to_string(),
            file_size,
            n_rows,
            columns,
        })
    }
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub file_size: u64,
    pub n_rows: usize,
    pub columns: Vec<String>,
}

/// Writer for feature record sets
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).finish(df)?;
        debug!(path = %path.display(), rows = df.height(), "Saved CSV");
        Ok(())
    }
}

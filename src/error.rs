//! Error types for the processor feature builder

use crate::preprocessing::ParseError;
use thiserror::Error;

/// Result type alias for feature building operations
pub type Result<T> = std::result::Result<T, SegmentError>;

/// Main error type for the feature builder
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema violation: declared column `{0}` is absent")]
    SchemaViolation(String),

    #[error("Unparseable cell in `{column}` at row {row}: {source}")]
    UnparseableCell {
        column: String,
        row: usize,
        #[source]
        source: ParseError,
    },

    #[error("Unknown category in `{column}`: {value:?}")]
    UnknownCategory { column: String, value: String },

    #[error("Cannot compute {statistic} of `{column}`: no observed values")]
    EmptyColumn {
        column: String,
        statistic: &'static str,
    },

    #[error("Column `{column}` still holds {missing} missing values")]
    IncompleteFeatures { column: String, missing: usize },

    #[error("Feature builder has no ingested data")]
    NotFitted,

    #[error("No fitted parameters recorded for `{0}`")]
    ParamsMissing(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for SegmentError {
    fn from(err: polars::error::PolarsError) -> Self {
        SegmentError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SegmentError {
    fn from(err: serde_json::Error) -> Self {
        SegmentError::SerializationError(err.to_string())
    }
}

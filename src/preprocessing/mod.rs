//! Processor table preprocessing
//!
//! Turns a raw processor specification table into a fully numeric feature
//! matrix:
//! - Per-column cell parsers (price, frequency, cache, bus, memory, temperature)
//! - Row-order interpolation and mode / mean imputation
//! - Quantile bucketing and min-max scaling
//! - Vocabulary indicator expansion and label encoding
//!
//! [`FeatureBuilder`] runs the fixed ordered stage list over one record set.

mod config;
mod imputer;
mod scaler;
mod encoder;
mod pipeline;
pub mod parsers;
pub mod stages;
pub mod transforms;
pub mod vocabulary;

pub use config::{FeatureConfig, UnknownCategoryPolicy};
pub use imputer::{ImputeStrategy, interpolate_linear, mean, mode_numeric, mode_text};
pub use scaler::MinMaxScaler;
pub use encoder::{CategoryKeys, LabelEncoder, expand_vocabulary, map_categories};
pub use pipeline::{FeatureBuilder, FittedParams, StageContext};
pub use parsers::{ParseError, Reading, CacheSpec};
pub use stages::{Stage, STAGES};
pub use transforms::QuantileBinner;
pub use vocabulary::Vocabulary;

use crate::error::{Result, SegmentError};
use polars::prelude::*;

/// Borrow a column, reporting an absent one as a schema violation
pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| SegmentError::SchemaViolation(name.to_string()))
}

/// Cells of a column as owned strings, whatever the column's dtype
pub(crate) fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column(df, name)?;
    let text = match series.dtype() {
        DataType::String => series.clone(),
        _ => series.cast(&DataType::String)?,
    };
    Ok(text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Cells of a column as numbers; text cells must parse, NaN counts as missing
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = column(df, name)?;
    if series.dtype() == &DataType::String {
        let cells = text_values(df, name)?;
        let numbers = parse_cells(name, &cells, parsers::parse_number)?;
        return Ok(numbers.into_iter().map(Option::flatten).collect());
    }

    let numbers = series.cast(&DataType::Float64)?;
    Ok(numbers
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Apply a fallible parser to every present cell, tagging failures with their row.
///
/// Cells holding the literal missing marker count as absent.
pub(crate) fn parse_cells<T>(
    name: &str,
    cells: &[Option<String>],
    parse: impl Fn(&str) -> std::result::Result<T, ParseError>,
) -> Result<Vec<Option<T>>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.as_deref()
                .filter(|raw| !parsers::is_missing_marker(raw))
                .map(&parse)
                .transpose()
                .map_err(|source| SegmentError::UnparseableCell {
                    column: name.to_string(),
                    row,
                    source,
                })
        })
        .collect()
}

/// Add `series` to the frame, replacing a column of the same name in place
pub(crate) fn replace_column(mut df: DataFrame, series: Series) -> Result<DataFrame> {
    df.with_column(series)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_values_from_numeric_column() {
        let df = df!("nb_of_Cores" => &[Some(4i64), None]).unwrap();
        let cells = text_values(&df, "nb_of_Cores").unwrap();
        assert_eq!(cells, vec![Some("4".to_string()), None]);
    }

    #[test]
    fn test_numeric_values_parse_text() {
        let df = df!("TDP" => &[Some(" 65"), None, Some("15.5")]).unwrap();
        let values = numeric_values(&df, "TDP").unwrap();
        assert_eq!(values, vec![Some(65.0), None, Some(15.5)]);
    }

    #[test]
    fn test_numeric_values_reports_row() {
        let df = df!("TDP" => &["65", "lots"]).unwrap();
        match numeric_values(&df, "TDP") {
            Err(SegmentError::UnparseableCell { column, row, .. }) => {
                assert_eq!(column, "TDP");
                assert_eq!(row, 1);
            }
            other => panic!("expected unparseable cell, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_text_counts_as_missing() {
        let df = df!("nb_of_Cores" => &[Some("2"), Some("nan"), Some("NaN"), None]).unwrap();
        assert_eq!(numeric_values(&df, "nb_of_Cores").unwrap(), vec![Some(2.0), None, None, None]);
    }

    #[test]
    fn test_infinite_text_rejected() {
        let df = df!("TDP" => &["65", "inf"]).unwrap();
        assert!(matches!(
            numeric_values(&df, "TDP"),
            Err(SegmentError::UnparseableCell { row: 1, .. })
        ));
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df!("x" => &[1.0, f64::NAN]).unwrap();
        assert_eq!(numeric_values(&df, "x").unwrap(), vec![Some(1.0), None]);
    }

    #[test]
    fn test_absent_column_is_schema_violation() {
        let df = df!("x" => &[1.0]).unwrap();
        assert!(matches!(
            text_values(&df, "Cache"),
            Err(SegmentError::SchemaViolation(_))
        ));
    }
}

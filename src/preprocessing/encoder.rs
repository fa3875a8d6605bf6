//! Categorical encoding implementations

use crate::error::{Result, SegmentError};
use super::config::UnknownCategoryPolicy;
use super::vocabulary::{lookup, Vocabulary};
use super::{replace_column, text_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Category values of one column, ready for label encoding
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryKeys {
    Text(Vec<String>),
    Numeric(Vec<f64>),
}

impl CategoryKeys {
    fn keys(&self) -> Vec<String> {
        match self {
            CategoryKeys::Text(values) => values.clone(),
            CategoryKeys::Numeric(values) => values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Label encoder assigning each class its position in ascending class order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the sorted distinct classes of a column
    pub fn fit(values: &CategoryKeys) -> Self {
        let classes = match values {
            CategoryKeys::Text(values) => {
                let mut classes = values.clone();
                classes.sort();
                classes.dedup();
                classes
            }
            CategoryKeys::Numeric(values) => {
                let mut sorted = values.clone();
                sorted.sort_by(f64::total_cmp);
                sorted.dedup();
                sorted.iter().map(|v| v.to_string()).collect()
            }
        };
        Self { classes }
    }

    /// Rebuild an encoder from previously learned classes
    pub fn from_classes(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Replace every value by its class code; unseen values are an error
    pub fn encode(&self, column: &str, values: &CategoryKeys) -> Result<Vec<i64>> {
        let index: HashMap<&str, i64> = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i as i64))
            .collect();

        values
            .keys()
            .into_iter()
            .map(|key| {
                index
                    .get(key.as_str())
                    .copied()
                    .ok_or_else(|| SegmentError::UnknownCategory {
                        column: column.to_string(),
                        value: key,
                    })
            })
            .collect()
    }
}

/// Map cells through an enumerated table.
///
/// Missing cells stay missing. Cells absent from the table follow `policy`.
pub fn map_categories(
    column: &str,
    values: &[Option<String>],
    table: &[(&str, f64)],
    policy: UnknownCategoryPolicy,
) -> Result<Vec<Option<f64>>> {
    values
        .iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(value) => match lookup(table, value) {
                Some(code) => Ok(Some(code)),
                None => policy.resolve(column, value),
            },
        })
        .collect()
}

impl UnknownCategoryPolicy {
    /// Outcome for a value no mapping covers
    pub fn resolve(&self, column: &str, value: &str) -> Result<Option<f64>> {
        match self {
            UnknownCategoryPolicy::Reject => Err(SegmentError::UnknownCategory {
                column: column.to_string(),
                value: value.to_string(),
            }),
            UnknownCategoryPolicy::TreatAsMissing => {
                warn!(column, value, "Unknown category treated as missing");
                Ok(None)
            }
        }
    }
}

/// Add one indicator column per vocabulary token and drop the composite column
pub fn expand_vocabulary(df: DataFrame, vocabulary: &Vocabulary) -> Result<DataFrame> {
    let cells = text_values(&df, vocabulary.source)?;
    let rows: Vec<Vec<i64>> = cells
        .iter()
        .map(|cell| vocabulary.indicators(cell.as_deref()))
        .collect();

    let mut result = df;
    for (t, token) in vocabulary.tokens.iter().enumerate() {
        let values: Vec<i64> = rows.iter().map(|flags| flags[t]).collect();
        result = replace_column(result, Series::new((*token).into(), values))?;
    }

    Ok(result.drop(vocabulary.source)?)
}

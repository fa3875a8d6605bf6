//! Missing value imputation strategies

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with mean (numeric only)
    Mean,
    /// Replace with mean rounded to the given number of decimals
    RoundedMean(u32),
    /// Replace with mode / most frequent value
    MostFrequent,
}

impl ImputeStrategy {
    /// Fill value for a numeric column
    pub fn numeric_fill(&self, column: &str, values: &[Option<f64>]) -> Result<f64> {
        match self {
            ImputeStrategy::Mean => mean(column, values),
            ImputeStrategy::RoundedMean(decimals) => Ok(round_to(mean(column, values)?, *decimals)),
            ImputeStrategy::MostFrequent => mode_numeric(column, values),
        }
    }

    /// Fill value for a text column; only the mode is defined
    pub fn text_fill(&self, column: &str, values: &[Option<String>]) -> Result<String> {
        match self {
            ImputeStrategy::MostFrequent => mode_text(column, values),
            other => Err(SegmentError::InvalidParameter {
                name: "strategy".to_string(),
                value: format!("{other:?}"),
                reason: format!("`{column}` holds text, only MostFrequent applies"),
            }),
        }
    }
}

/// Mean of the observed values
pub fn mean(column: &str, values: &[Option<f64>]) -> Result<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return Err(SegmentError::EmptyColumn {
            column: column.to_string(),
            statistic: "mean",
        });
    }
    Ok(sum / count as f64)
}

/// Most frequent observed value; ties go to the smallest value
pub fn mode_numeric(column: &str, values: &[Option<f64>]) -> Result<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    observed.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    for run in observed.chunk_by(|a, b| a == b) {
        if best.map_or(true, |(_, count)| run.len() > count) {
            best = Some((run[0], run.len()));
        }
    }

    best.map(|(value, _)| value).ok_or_else(|| SegmentError::EmptyColumn {
        column: column.to_string(),
        statistic: "mode",
    })
}

/// Most frequent observed string; ties go to the lexicographically smallest
pub fn mode_text(column: &str, values: &[Option<String>]) -> Result<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for val in values.iter().flatten() {
        *counts.entry(val.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
        .ok_or_else(|| SegmentError::EmptyColumn {
            column: column.to_string(),
            statistic: "mode",
        })
}

/// Fill the gaps between observed values by straight lines over row position.
///
/// Gaps after the last observation repeat it; gaps before the first stay missing.
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = values.to_vec();
    let mut last: Option<(usize, f64)> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else { continue };
        if let Some((j, prev)) = last {
            let span = (i - j) as f64;
            for (k, slot) in result.iter_mut().enumerate().take(i).skip(j + 1) {
                *slot = Some(prev + (v - prev) * (k - j) as f64 / span);
            }
        }
        last = Some((i, v));
    }

    if let Some((j, v)) = last {
        for slot in result.iter_mut().skip(j + 1) {
            *slot = Some(v);
        }
    }
    result
}

/// Replace missing numbers with `fill`
pub fn fill_numeric(values: &[Option<f64>], fill: f64) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(fill)).collect()
}

/// Replace missing strings with `fill`
pub fn fill_text(values: Vec<Option<String>>, fill: &str) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill.to_string()))
        .collect()
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

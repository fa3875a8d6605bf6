//! Feature scaling

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};

/// Min-max scaler mapping a column's observed range onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    /// Learn the range of the observed values
    pub fn fit(column: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(SegmentError::EmptyColumn {
                column: column.to_string(),
                statistic: "min-max range",
            });
        }
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Ok(Self { min, max })
    }

    /// (x - min) / (max - min); a constant column maps to 0
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        let range = self.max - self.min;
        let scale = if range == 0.0 { 1.0 } else { range };
        values.iter().map(|v| (v - self.min) / scale).collect()
    }
}

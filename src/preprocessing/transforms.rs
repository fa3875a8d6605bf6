//! Binning / discretization

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};

/// Equal-frequency binner over one column.
///
/// Bins are right-closed, `(e[i], e[i + 1]]`, except the first which also
/// holds its lower edge. Values outside the fitted range clamp to the
/// first or last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBinner {
    edges: Vec<f64>,
}

impl QuantileBinner {
    /// Compute `n_bins + 1` quantile edges; repeated edges collapse
    pub fn fit(column: &str, values: &[f64], n_bins: usize) -> Result<Self> {
        if values.is_empty() {
            return Err(SegmentError::EmptyColumn {
                column: column.to_string(),
                statistic: "quantiles",
            });
        }
        if n_bins == 0 {
            return Err(SegmentError::InvalidParameter {
                name: "n_bins".to_string(),
                value: n_bins.to_string(),
                reason: "at least one bin is required".to_string(),
            });
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut edges: Vec<f64> = (0..=n_bins)
            .map(|i| quantile(&sorted, i as f64 / n_bins as f64))
            .collect();
        edges.dedup();

        Ok(Self { edges })
    }

    /// Rebuild a binner from stored edges
    pub fn from_edges(edges: Vec<f64>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins
    pub fn n_bins(&self) -> usize {
        self.edges.len().saturating_sub(1).max(1)
    }

    /// Bin index of every value
    pub fn transform(&self, values: &[f64]) -> Vec<usize> {
        values.iter().map(|&v| self.find_bin(v)).collect()
    }

    fn find_bin(&self, value: f64) -> usize {
        // upper edges of all bins but the last
        let inner = &self.edges[1..self.edges.len().saturating_sub(1).max(1)];
        inner.iter().take_while(|&&upper| value > upper).count()
    }
}

/// Linearly interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

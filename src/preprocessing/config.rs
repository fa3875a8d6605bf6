//! Feature builder configuration

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};

/// What to do with a value outside an enumerated mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnknownCategoryPolicy {
    /// Abort the build with [`SegmentError::UnknownCategory`]
    #[default]
    Reject,
    /// Treat the value as missing so the column's imputation fills it
    TreatAsMissing,
}

/// Configuration for the feature builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Number of equal-frequency price buckets
    pub price_buckets: usize,

    /// Handling of status, flag and PCI Express values no table covers
    pub unknown_categories: UnknownCategoryPolicy,

    /// Decimals kept when a column is filled with its rounded mean
    pub mean_decimals: u32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            price_buckets: 5,
            unknown_categories: UnknownCategoryPolicy::Reject,
            mean_decimals: 2,
        }
    }
}

impl FeatureConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of price buckets
    pub fn with_price_buckets(mut self, buckets: usize) -> Self {
        self.price_buckets = buckets;
        self
    }

    /// Builder method to set the unknown category policy
    pub fn with_unknown_categories(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown_categories = policy;
        self
    }

    /// Builder method to set rounding of mean fills
    pub fn with_mean_decimals(mut self, decimals: u32) -> Self {
        self.mean_decimals = decimals;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.price_buckets == 0 {
            return Err(SegmentError::InvalidParameter {
                name: "price_buckets".to_string(),
                value: self.price_buckets.to_string(),
                reason: "at least one bucket is required".to_string(),
            });
        }
        Ok(())
    }
}

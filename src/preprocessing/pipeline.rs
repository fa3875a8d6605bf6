//! Feature building pipeline

use crate::error::{Result, SegmentError};
use crate::schema::{self, FeatureSchema};
use super::{
    config::FeatureConfig,
    encoder::{CategoryKeys, LabelEncoder},
    imputer::ImputeStrategy,
    scaler::MinMaxScaler,
    stages::STAGES,
    transforms::QuantileBinner,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Every data-dependent statistic learned while building features.
///
/// Reapplying these to another split keeps bucket edges, fill values and
/// label codes identical to the ones the training features used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedParams {
    pub fill_values: BTreeMap<String, f64>,
    /// Fills of columns still holding raw text, keyed apart from numeric fills
    pub text_fills: BTreeMap<String, String>,
    pub bucket_edges: BTreeMap<String, Vec<f64>>,
    pub label_classes: BTreeMap<String, Vec<String>>,
    pub scale_ranges: BTreeMap<String, MinMaxScaler>,
}

impl FittedParams {
    /// Save the parameters to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load parameters from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Learn a statistic, or look up the stored one when parameters are frozen.
///
/// Each column is learned at most once per store; a second learn would
/// silently replace the value an earlier stage already applied.
fn resolve<T: Clone>(
    frozen: bool,
    store: &mut BTreeMap<String, T>,
    column: &str,
    learn: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if frozen {
        return store
            .get(column)
            .cloned()
            .ok_or_else(|| SegmentError::ParamsMissing(column.to_string()));
    }
    if store.contains_key(column) {
        return Err(SegmentError::ConfigError(format!(
            "statistic for `{column}` learned twice in one build"
        )));
    }
    let value = learn()?;
    store.insert(column.to_string(), value.clone());
    Ok(value)
}

/// State threaded through the stages of one run
#[derive(Debug)]
pub struct StageContext<'a> {
    config: &'a FeatureConfig,
    params: FittedParams,
    frozen: bool,
}

impl<'a> StageContext<'a> {
    /// Context that learns fresh statistics from the data
    pub fn learning(config: &'a FeatureConfig) -> Self {
        Self {
            config,
            params: FittedParams::default(),
            frozen: false,
        }
    }

    /// Context that reuses statistics learned by an earlier build
    pub fn reusing(config: &'a FeatureConfig, params: FittedParams) -> Self {
        Self {
            config,
            params,
            frozen: true,
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        self.config
    }

    pub fn into_params(self) -> FittedParams {
        self.params
    }

    /// Fill value for a numeric column
    pub fn numeric_fill(
        &mut self,
        column: &str,
        strategy: ImputeStrategy,
        values: &[Option<f64>],
    ) -> Result<f64> {
        resolve(self.frozen, &mut self.params.fill_values, column, || {
            strategy.numeric_fill(column, values)
        })
    }

    /// Fill value for a text column
    pub fn text_fill(
        &mut self,
        column: &str,
        strategy: ImputeStrategy,
        values: &[Option<String>],
    ) -> Result<String> {
        resolve(self.frozen, &mut self.params.text_fills, column, || {
            strategy.text_fill(column, values)
        })
    }

    /// Quantile binner for a column
    pub fn binner(&mut self, column: &str, values: &[f64]) -> Result<QuantileBinner> {
        let n_bins = self.config.price_buckets;
        let edges = resolve(self.frozen, &mut self.params.bucket_edges, column, || {
            QuantileBinner::fit(column, values, n_bins).map(|b| b.edges().to_vec())
        })?;
        Ok(QuantileBinner::from_edges(edges))
    }

    /// Number of buckets of a column already cut by [`binner`](Self::binner)
    pub fn bucket_count(&self, column: &str) -> Result<usize> {
        self.params
            .bucket_edges
            .get(column)
            .map(|edges| QuantileBinner::from_edges(edges.clone()).n_bins())
            .ok_or_else(|| SegmentError::ParamsMissing(column.to_string()))
    }

    /// Label encoder for a column, fitted on `keys` when learning
    pub fn label_encoder(&mut self, column: &str, keys: &CategoryKeys) -> Result<LabelEncoder> {
        let classes = resolve(self.frozen, &mut self.params.label_classes, column, || {
            Ok(LabelEncoder::fit(keys).classes().to_vec())
        })?;
        Ok(LabelEncoder::from_classes(classes))
    }

    /// Min-max scaler for a column
    pub fn scaler(&mut self, column: &str, values: &[f64]) -> Result<MinMaxScaler> {
        resolve(self.frozen, &mut self.params.scale_ranges, column, || {
            MinMaxScaler::fit(column, values)
        })
    }
}

/// Builds the numeric feature matrix from a raw processor table.
///
/// Ingest one record set with [`fit`](Self::fit), then produce the features
/// with [`load_data`](Self::load_data). The statistics learned there can be
/// reapplied to other splits with [`transform`](Self::transform).
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    config: FeatureConfig,
    schema: FeatureSchema,
    dataset: Option<DataFrame>,
    params: Option<FittedParams>,
    /// Timing: seconds spent in the last build
    build_time: Option<f64>,
}

impl FeatureBuilder {
    /// Create a builder with default configuration and schema
    pub fn new() -> Self {
        Self::with_config(FeatureConfig::default())
    }

    /// Create a builder with custom configuration
    pub fn with_config(config: FeatureConfig) -> Self {
        Self {
            config,
            schema: FeatureSchema::default(),
            dataset: None,
            params: None,
            build_time: None,
        }
    }

    /// Builder method to declare the input schema
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Builder method to install parameters learned by an earlier build
    pub fn with_params(mut self, params: FittedParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Ingest a copy of the declared input columns of `df`
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.config.validate()?;
        let dataset = self.prepare(df)?;
        debug!(rows = dataset.height(), columns = dataset.width(), "Ingested raw record set");
        self.dataset = Some(dataset);
        Ok(self)
    }

    /// Run every stage over the ingested record set, learning fresh parameters
    pub fn load_data(&mut self) -> Result<DataFrame> {
        let dataset = self.dataset.as_ref().ok_or(SegmentError::NotFitted)?;
        let start = Instant::now();

        let mut ctx = StageContext::learning(&self.config);
        let features = run_stages(dataset.clone(), &mut ctx)?;
        let params = ctx.into_params();

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            rows = features.height(),
            columns = features.width(),
            elapsed_secs = elapsed,
            "Built feature record set"
        );
        self.params = Some(params);
        self.build_time = Some(elapsed);
        Ok(features)
    }

    /// Ingest and build in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.load_data()
    }

    /// Build features for another record set using the learned parameters
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let params = self.params.clone().ok_or(SegmentError::NotFitted)?;
        let start = Instant::now();

        let dataset = self.prepare(df)?;
        let mut ctx = StageContext::reusing(&self.config, params);
        let features = run_stages(dataset, &mut ctx)?;

        info!(
            rows = features.height(),
            columns = features.width(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Applied fitted parameters"
        );
        Ok(features)
    }

    /// Parameters learned by the last build
    pub fn fitted_params(&self) -> Option<&FittedParams> {
        self.params.as_ref()
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Seconds spent in the last build
    pub fn build_time(&self) -> Option<f64> {
        self.build_time
    }

    /// Select the declared inputs and check every column the stages read is there
    fn prepare(&self, df: &DataFrame) -> Result<DataFrame> {
        let dataset = self.schema.select_inputs(df)?;
        schema::check_rule_columns(&dataset)?;
        Ok(dataset)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the fixed stage list; rows must come out exactly as they went in
fn run_stages(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let rows = df.height();
    let mut df = df;

    for stage in STAGES {
        let start = Instant::now();
        df = (stage.run)(df, ctx)?;
        debug!(
            stage = stage.name,
            columns = df.width(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stage complete"
        );
    }

    if df.height() != rows {
        return Err(SegmentError::DataError(format!(
            "row count changed from {rows} to {}",
            df.height()
        )));
    }
    Ok(df)
}

//! Ordered feature building stages
//!
//! Each stage takes the record set produced by the previous one and returns
//! a new one. Stages read columns by name, so their order in [`STAGES`] is
//! part of the contract: derived columns exist before their source column is
//! dropped, and label encoding runs once every categorical column exists.

use crate::error::{Result, SegmentError};
use crate::schema::{columns::*, DROPPED_COLUMNS, FLAG_COLUMNS, INTEGER_COUNT_COLUMNS, LABEL_ENCODED_COLUMNS, MODE_FILLED_COLUMNS};
use super::encoder::{expand_vocabulary, map_categories, CategoryKeys};
use super::imputer::{fill_numeric, fill_text, interpolate_linear, ImputeStrategy};
use super::parsers::{self, CacheSpec, ParseError};
use super::pipeline::StageContext;
use super::vocabulary::{FLAG_CODES, MULTI_VALUED, STATUS_CODES};
use super::{numeric_values, parse_cells, replace_column, text_values};
use polars::prelude::*;

/// Signature shared by every stage
pub type StageFn = fn(DataFrame, &mut StageContext<'_>) -> Result<DataFrame>;

/// A named step of the pipeline
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// The pipeline, in execution order
pub const STAGES: &[Stage] = &[
    Stage { name: "prune_columns", run: prune_columns },
    Stage { name: "impute_base_frequency", run: impute_base_frequency },
    Stage { name: "normalize_status", run: normalize_status },
    Stage { name: "bucket_price", run: bucket_price },
    Stage { name: "fill_count_columns", run: fill_count_columns },
    Stage { name: "parse_unit_columns", run: parse_unit_columns },
    Stage { name: "derive_cache", run: derive_cache },
    Stage { name: "derive_bus_type", run: derive_bus_type },
    Stage { name: "normalize_flags", run: normalize_flags },
    Stage { name: "normalize_pcie_revision", run: normalize_pcie_revision },
    Stage { name: "parse_temperature", run: parse_temperature },
    Stage { name: "combine_instruction_set", run: combine_instruction_set },
    Stage { name: "expand_multi_valued", run: expand_multi_valued },
    Stage { name: "encode_labels", run: encode_labels },
    Stage { name: "verify_complete", run: verify_complete },
];

fn float_series(name: &str, values: Vec<f64>) -> Series {
    Series::new(name.into(), values)
}

fn int_series(name: &str, values: Vec<i64>) -> Series {
    Series::new(name.into(), values)
}

/// Run an optional-cell parser over a column, tagging failures with their row
fn parse_column<T>(
    df: &DataFrame,
    name: &str,
    parse: impl Fn(Option<&str>) -> std::result::Result<Option<T>, ParseError>,
) -> Result<Vec<Option<T>>> {
    text_values(df, name)?
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            let cell = cell.as_deref().filter(|raw| !parsers::is_missing_marker(raw));
            parse(cell).map_err(|source| SegmentError::UnparseableCell {
                column: name.to_string(),
                row,
                source,
            })
        })
        .collect()
}

/// Numeric cells of a column that earlier stages already filled
fn complete_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = numeric_values(df, name)?;
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(SegmentError::IncompleteFeatures {
            column: name.to_string(),
            missing,
        });
    }
    Ok(values.into_iter().flatten().collect())
}

/// Fill a numeric column's gaps with the strategy's value
fn impute(
    ctx: &mut StageContext<'_>,
    name: &str,
    strategy: ImputeStrategy,
    values: &[Option<f64>],
) -> Result<Vec<f64>> {
    let fill = ctx.numeric_fill(name, strategy, values)?;
    Ok(fill_numeric(values, fill))
}

/// Remove the columns no feature is built from
pub fn prune_columns(df: DataFrame, _ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let present: Vec<String> = df.get_column_names().into_iter().map(|c| c.to_string()).collect();
    let mut result = df;
    for name in DROPPED_COLUMNS.iter().filter(|c| present.iter().any(|p| p == *c)) {
        result = result.drop(name)?;
    }
    Ok(result)
}

/// Fill the raw base frequency with its most frequent descriptor before parsing
pub fn impute_base_frequency(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let cells = text_values(&df, BASE_FREQUENCY)?;
    let fill = ctx.text_fill(BASE_FREQUENCY, ImputeStrategy::MostFrequent, &cells)?;
    let filled = fill_text(cells, &fill);
    replace_column(df, Series::new(BASE_FREQUENCY.into(), filled))
}

/// Lifecycle status as 0 (end of support or life) or 1 (launched or announced)
pub fn normalize_status(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let cells = text_values(&df, STATUS)?;
    let codes = map_categories(STATUS, &cells, STATUS_CODES, ctx.config().unknown_categories)?;
    let filled = impute(ctx, STATUS, ImputeStrategy::MostFrequent, &codes)?;
    let status: Vec<i64> = filled.into_iter().map(|v| v as i64).collect();
    replace_column(df, int_series(STATUS, status))
}

/// Price bucket index from the recommended customer price.
///
/// The cleaned price is interpolated over row order, leading gaps take the
/// mode, and the result is cut into equal-frequency buckets.
pub fn bucket_price(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let cells: Vec<Option<String>> = text_values(&df, PRICE)?
        .into_iter()
        .map(|c| c.map(|raw| parsers::clean_price(&raw)))
        .collect();
    let prices = parse_cells(PRICE, &cells, parsers::parse_price)?;

    let interpolated = interpolate_linear(&prices);
    let filled = impute(ctx, PRICE, ImputeStrategy::MostFrequent, &interpolated)?;

    let binner = ctx.binner(PRICE, &filled)?;
    let buckets: Vec<i64> = binner.transform(&filled).into_iter().map(|b| b as i64).collect();
    replace_column(df, int_series(PRICE, buckets))
}

/// Core, thread, memory channel and PCI Express lane counts
pub fn fill_count_columns(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let mut result = df;

    for &name in INTEGER_COUNT_COLUMNS {
        let values = interpolate_linear(&numeric_values(&result, name)?);
        let filled = impute(ctx, name, ImputeStrategy::MostFrequent, &values)?;
        let counts: Vec<i64> = filled.into_iter().map(|v| v as i64).collect();
        result = replace_column(result, int_series(name, counts))?;
    }

    for &name in MODE_FILLED_COLUMNS {
        let values = numeric_values(&result, name)?;
        let filled = impute(ctx, name, ImputeStrategy::MostFrequent, &values)?;
        result = replace_column(result, float_series(name, filled))?;
    }

    Ok(result)
}

/// Frequency in GHz, TDP in W, memory size in GB and bandwidth in GB/s
pub fn parse_unit_columns(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let mean_decimals = ctx.config().mean_decimals;
    let mut result = df;

    let frequency = parse_cells(BASE_FREQUENCY, &text_values(&result, BASE_FREQUENCY)?, parsers::parse_frequency)?;
    let frequency = impute(ctx, BASE_FREQUENCY, ImputeStrategy::MostFrequent, &frequency)?;
    result = replace_column(result, float_series(BASE_FREQUENCY, frequency))?;

    let tdp = parse_column(&result, TDP, |raw| parsers::parse_with_unit(raw, "W"))?;
    let tdp = impute(ctx, TDP, ImputeStrategy::Mean, &tdp)?;
    result = replace_column(result, float_series(TDP, tdp))?;

    let memory = parse_column(&result, MAX_MEMORY_SIZE, parsers::parse_memory_size)?;
    let memory = impute(ctx, MAX_MEMORY_SIZE, ImputeStrategy::MostFrequent, &memory)?;
    result = replace_column(result, float_series(MAX_MEMORY_SIZE, memory))?;

    let bandwidth = parse_column(&result, MEMORY_BANDWIDTH, |raw| parsers::parse_with_unit(raw, "GB/s"))?;
    let bandwidth = impute(ctx, MEMORY_BANDWIDTH, ImputeStrategy::RoundedMean(mean_decimals), &bandwidth)?;
    replace_column(result, float_series(MEMORY_BANDWIDTH, bandwidth))
}

/// Split the cache descriptor into `Cache_Size` (MB) and `Cache_Type`
pub fn derive_cache(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let specs: Vec<Option<CacheSpec>> = parse_column(&df, CACHE, parsers::parse_cache)?;

    let sizes: Vec<Option<f64>> = specs.iter().map(|s| s.as_ref().map(|s| s.size_mb)).collect();
    let kinds: Vec<Option<String>> = specs.into_iter().map(|s| s.map(|s| s.kind)).collect();

    let sizes = impute(ctx, CACHE_SIZE, ImputeStrategy::MostFrequent, &sizes)?;
    let kind_fill = ctx.text_fill(CACHE_TYPE, ImputeStrategy::MostFrequent, &kinds)?;
    let kinds = fill_text(kinds, &kind_fill);

    let result = replace_column(df, float_series(CACHE_SIZE, sizes))?;
    let result = replace_column(result, Series::new(CACHE_TYPE.into(), kinds))?;
    Ok(result.drop(CACHE)?)
}

/// Bus type from the last token of the bus speed descriptor
pub fn derive_bus_type(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let bus_types: Vec<Option<String>> = text_values(&df, BUS_SPEED)?
        .iter()
        .map(|cell| parsers::parse_bus_type(cell.as_deref()))
        .collect();
    let fill = ctx.text_fill(BUS_TYPE, ImputeStrategy::MostFrequent, &bus_types)?;
    let bus_types = fill_text(bus_types, &fill);

    let result = replace_column(df, Series::new(BUS_TYPE.into(), bus_types))?;
    Ok(result.drop(BUS_SPEED)?)
}

/// Yes/No flags as 1/0, interpolated over row order, leading gaps take the mode
pub fn normalize_flags(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let policy = ctx.config().unknown_categories;
    let mut result = df;

    for &name in FLAG_COLUMNS {
        let cells = text_values(&result, name)?;
        let codes = interpolate_linear(&map_categories(name, &cells, FLAG_CODES, policy)?);
        let filled = impute(ctx, name, ImputeStrategy::MostFrequent, &codes)?;
        result = replace_column(result, float_series(name, filled))?;
    }

    Ok(result)
}

/// PCI Express revision as 3.0, 2.0, 1.0 or 0.0
pub fn normalize_pcie_revision(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let policy = ctx.config().unknown_categories;
    let revisions: Vec<Option<f64>> = text_values(&df, PCIE_REVISION)?
        .iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(raw) => match parsers::parse_pcie_revision(raw) {
                Some(revision) => Ok(Some(revision)),
                None => policy.resolve(PCIE_REVISION, raw),
            },
        })
        .collect::<Result<_>>()?;

    let filled = impute(ctx, PCIE_REVISION, ImputeStrategy::MostFrequent, &revisions)?;
    replace_column(df, float_series(PCIE_REVISION, filled))
}

/// Maximum case temperature; gaps take the rounded mean
pub fn parse_temperature(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let readings: Vec<Option<f64>> = text_values(&df, TEMPERATURE)?
        .iter()
        .map(|cell| parsers::parse_temperature(cell.as_deref()).into())
        .collect();

    let strategy = ImputeStrategy::RoundedMean(ctx.config().mean_decimals);
    let filled = impute(ctx, TEMPERATURE, strategy, &readings)?;
    replace_column(df, float_series(TEMPERATURE, filled))
}

/// Instruction width plus the 64-bit flag, scaled to [0, 1].
///
/// The 64-bit flag column is dropped afterwards.
pub fn combine_instruction_set(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    let width: Vec<Option<f64>> = text_values(&df, INSTRUCTION_SET)?
        .iter()
        .map(|cell| parsers::parse_instruction_width(cell.as_deref()))
        .collect();
    let width = impute(ctx, INSTRUCTION_SET, ImputeStrategy::MostFrequent, &width)?;

    let intel_64 = complete_values(&df, INTEL_64)?;
    let combined: Vec<f64> = width.iter().zip(&intel_64).map(|(w, flag)| w + flag).collect();

    let scaler = ctx.scaler(INSTRUCTION_SET, &combined)?;
    let result = replace_column(df, float_series(INSTRUCTION_SET, scaler.transform(&combined)))?;
    Ok(result.drop(INTEL_64)?)
}

/// One indicator column per known instruction set extension and memory type
pub fn expand_multi_valued(df: DataFrame, _ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    MULTI_VALUED
        .iter()
        .try_fold(df, |acc, vocabulary| expand_vocabulary(acc, vocabulary))
}

/// Replace the remaining categorical columns with small integer codes
pub fn encode_labels(df: DataFrame, ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    LABEL_ENCODED_COLUMNS
        .iter()
        .try_fold(df, |acc, name| encode_column(acc, ctx, name))
}

/// Label-encode one column.
///
/// Price buckets learn every bucket the stored edges define, so a bucket
/// left empty by the fitting sample still has a code on reapply. Collection
/// and lithography gaps take the mode here; derived columns arrive filled.
fn encode_column(df: DataFrame, ctx: &mut StageContext<'_>, name: &str) -> Result<DataFrame> {
    let (classes, keys) = if name == PRICE {
        let buckets = (0..ctx.bucket_count(name)?).map(|b| b as f64).collect();
        (CategoryKeys::Numeric(buckets), CategoryKeys::Numeric(complete_values(&df, name)?))
    } else {
        let cells = text_values(&df, name)?;
        let keys = if matches!(name, PRODUCT_COLLECTION | LITHOGRAPHY) {
            let fill = ctx.text_fill(name, ImputeStrategy::MostFrequent, &cells)?;
            fill_text(cells, &fill)
        } else {
            complete_text(name, cells)?
        };
        (CategoryKeys::Text(keys.clone()), CategoryKeys::Text(keys))
    };

    let encoder = ctx.label_encoder(name, &classes)?;
    let codes = encoder.encode(name, &keys)?;
    replace_column(df, int_series(name, codes))
}

/// Text cells of a column that earlier stages already filled
fn complete_text(name: &str, cells: Vec<Option<String>>) -> Result<Vec<String>> {
    let missing = cells.iter().filter(|c| c.is_none()).count();
    if missing > 0 {
        return Err(SegmentError::IncompleteFeatures {
            column: name.to_string(),
            missing,
        });
    }
    Ok(cells.into_iter().flatten().collect())
}

/// Every column must be numeric and complete; NaN and infinities count as gaps
pub fn verify_complete(df: DataFrame, _ctx: &mut StageContext<'_>) -> Result<DataFrame> {
    for col in df.get_columns() {
        let non_finite = match col.dtype() {
            DataType::Float64 => col.f64()?.into_iter().flatten().filter(|v| !v.is_finite()).count(),
            _ => 0,
        };
        let missing = col.null_count() + non_finite;
        if missing > 0 {
            return Err(SegmentError::IncompleteFeatures {
                column: col.name().to_string(),
                missing,
            });
        }
        if !matches!(col.dtype(), DataType::Int64 | DataType::Float64) {
            return Err(SegmentError::DataError(format!(
                "column `{}` is {} after encoding, expected a number",
                col.name(),
                col.dtype()
            )));
        }
    }
    Ok(df)
}

//! CPU segment CLI module
//!
//! Command-line interface for building the feature matrix and reapplying
//! fitted parameters to other splits.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{FeatureBuilder, FeatureConfig, FittedParams, UnknownCategoryPolicy};
use crate::schema::FeatureSchema;
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn shape(df: &DataFrame) -> String {
    format!("{} rows × {} cols", df.height(), df.width())
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cpu-segment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build numeric features from processor specification tables")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build features from a raw table, learning fill values, buckets and codes
    Build {
        /// Raw processor table (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Specifications file declaring the input columns
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Output feature file (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Where to save the learned parameters (JSON)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Number of equal-frequency price buckets
        #[arg(long, default_value = "5")]
        buckets: usize,

        /// Unknown category handling (reject, missing)
        #[arg(long, default_value = "reject")]
        unknown: String,
    },

    /// Build features for another split with previously learned parameters
    Apply {
        /// Raw processor table (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Parameters saved by `build`
        #[arg(short, long)]
        params: PathBuf,

        /// Specifications file declaring the input columns
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Output feature file (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Unknown category handling (reject, missing)
        #[arg(long, default_value = "reject")]
        unknown: String,
    },

    /// Show header and row count of a raw table
    Info {
        /// Raw processor table (CSV)
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn parse_policy(unknown: &str) -> anyhow::Result<UnknownCategoryPolicy> {
    match unknown {
        "reject" => Ok(UnknownCategoryPolicy::Reject),
        "missing" => Ok(UnknownCategoryPolicy::TreatAsMissing),
        _ => anyhow::bail!("Invalid unknown category policy: {}", unknown),
    }
}

fn load_schema(path: Option<&Path>) -> anyhow::Result<FeatureSchema> {
    match path {
        Some(path) => Ok(FeatureSchema::from_json_file(path)?),
        None => Ok(FeatureSchema::default()),
    }
}

fn load_data(path: &Path) -> anyhow::Result<DataFrame> {
    step_run("Loading data");
    let df = DataLoader::new().load_csv(path)?;
    step_done(&shape(&df));
    Ok(df)
}

fn save_features(features: &mut DataFrame, path: &Path) -> anyhow::Result<()> {
    step_run(&format!("Saving → {}", path.display()));
    DataSaver::save_csv(features, path)?;
    step_done(&shape(features));
    Ok(())
}

pub fn cmd_build(
    data_path: &Path,
    schema_path: Option<&Path>,
    output_path: &Path,
    params_path: Option<&Path>,
    buckets: usize,
    unknown: &str,
) -> anyhow::Result<()> {
    section("Build");

    let config = FeatureConfig::default()
        .with_price_buckets(buckets)
        .with_unknown_categories(parse_policy(unknown)?);
    let schema = load_schema(schema_path)?;
    let df = load_data(data_path)?;

    step_run("Building features");
    let start = Instant::now();
    let mut builder = FeatureBuilder::with_config(config).with_schema(schema);
    let mut features = builder.fit_transform(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    save_features(&mut features, output_path)?;

    if let (Some(path), Some(params)) = (params_path, builder.fitted_params()) {
        step_run(&format!("Saving parameters → {}", path.display()));
        params.save(path)?;
        step_done(&format!(
            "{} fills, {} encoders",
            params.fill_values.len(),
            params.label_classes.len()
        ));
    }

    println!();
    Ok(())
}

pub fn cmd_apply(
    data_path: &Path,
    params_path: &Path,
    schema_path: Option<&Path>,
    output_path: &Path,
    unknown: &str,
) -> anyhow::Result<()> {
    section("Apply");

    step_run("Loading parameters");
    let params = FittedParams::load(params_path)?;
    step_done(&format!("{} fills", params.fill_values.len()));

    let config = FeatureConfig::default().with_unknown_categories(parse_policy(unknown)?);
    let schema = load_schema(schema_path)?;
    let df = load_data(data_path)?;

    step_run("Applying parameters");
    let start = Instant::now();
    let builder = FeatureBuilder::with_config(config)
        .with_schema(schema)
        .with_params(params);
    let mut features = builder.transform(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    save_features(&mut features, output_path)?;

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Dataset Info");

    let info = DataLoader::new().get_file_info(data_path)?;
    println!("  {}", kv("File    ", &info.path));
    println!("  {}", kv("Size    ", &format!("{} bytes", info.file_size)));
    println!("  {}", kv("Rows    ", &info.n_rows.to_string()));
    println!("  {}", kv("Columns ", &info.columns.len().to_string()));
    println!();

    let schema = FeatureSchema::default();
    for col in &info.columns {
        let marker = if schema.input_columns.contains(col) {
            ok("✓")
        } else if *col == schema.target_column {
            accent("◆")
        } else {
            dim("·")
        };
        println!("  {} {}", marker, col);
    }

    println!();
    Ok(())
}

//! CPU segment - feature builder for processor specification tables
//!
//! Turns a raw table of processor specifications (prices, clock speeds,
//! cache and bus descriptors, Yes/No capability flags, free-form instruction
//! set and memory type lists) into a fully numeric, fully populated feature
//! matrix for predicting a processor's market segment.
//!
//! # Modules
//!
//! - [`schema`] - Column names and declared input schema
//! - [`preprocessing`] - Cell parsers, imputation, encoding and the stage pipeline
//! - [`utils`] - CSV loading and saving
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use cpu_segment::prelude::*;
//! use cpu_segment::utils::DataLoader;
//!
//! # fn main() -> cpu_segment::Result<()> {
//! let raw = DataLoader::new().load_csv("processors.csv")?;
//! let mut builder = FeatureBuilder::new();
//! builder.fit(&raw)?;
//! let features = builder.load_data()?;
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Feature building
pub mod schema;
pub mod preprocessing;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{SegmentError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{SegmentError, Result};

    // Schema
    pub use crate::schema::FeatureSchema;

    // Preprocessing
    pub use crate::preprocessing::{
        FeatureBuilder, FeatureConfig, FittedParams, UnknownCategoryPolicy,
    };
}

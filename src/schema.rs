//! Column schema of the processor specification table
//!
//! The feature builder encodes a fixed set of per-column rules, so every
//! column it touches is named here. [`FeatureSchema`] declares which of those
//! columns a raw record set must carry.

use crate::error::{Result, SegmentError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw and derived column names
pub mod columns {
    pub const PRODUCT_COLLECTION: &str = "Product_Collection";
    pub const VERTICAL_SEGMENT: &str = "Vertical_Segment";
    pub const PROCESSOR_NUMBER: &str = "Processor_Number";
    pub const STATUS: &str = "Status";
    pub const LAUNCH_DATE: &str = "Launch_Date";
    pub const LITHOGRAPHY: &str = "Lithography";
    pub const PRICE: &str = "Recommended_Customer_Price";
    pub const CORES: &str = "nb_of_Cores";
    pub const THREADS: &str = "nb_of_Threads";
    pub const BASE_FREQUENCY: &str = "Processor_Base_Frequency";
    pub const MAX_TURBO_FREQUENCY: &str = "Max_Turbo_Frequency";
    pub const CACHE: &str = "Cache";
    pub const BUS_SPEED: &str = "Bus_Speed";
    pub const TDP: &str = "TDP";
    pub const EMBEDDED_OPTIONS: &str = "Embedded_Options_Available";
    pub const CONFLICT_FREE: &str = "Conflict_Free";
    pub const MAX_MEMORY_SIZE: &str = "Max_Memory_Size";
    pub const MEMORY_TYPES: &str = "Memory_Types";
    pub const MEMORY_CHANNELS: &str = "Max_nb_of_Memory_Channels";
    pub const MEMORY_BANDWIDTH: &str = "Max_Memory_Bandwidth";
    pub const ECC_MEMORY: &str = "ECC_Memory_Supported";
    pub const PROCESSOR_GRAPHICS: &str = "Processor_Graphics_";
    pub const GRAPHICS_BASE_FREQUENCY: &str = "Graphics_Base_Frequency";
    pub const GRAPHICS_MAX_FREQUENCY: &str = "Graphics_Max_Dynamic_Frequency";
    pub const GRAPHICS_VIDEO_MEMORY: &str = "Graphics_Video_Max_Memory";
    pub const GRAPHICS_OUTPUT: &str = "Graphics_Output";
    pub const SUPPORT_4K: &str = "Support_4k";
    pub const MAX_RESOLUTION_HDMI: &str = "Max_Resolution_HDMI";
    pub const MAX_RESOLUTION_DP: &str = "Max_Resolution_DP";
    pub const MAX_RESOLUTION_EDP: &str = "Max_Resolution_eDP_Integrated_Flat_Panel";
    pub const DIRECTX: &str = "DirectX_Support";
    pub const OPENGL: &str = "OpenGL_Support";
    pub const PCIE_REVISION: &str = "PCI_Express_Revision";
    pub const PCIE_CONFIGURATIONS: &str = "PCI_Express_Configurations_";
    pub const PCIE_LANES: &str = "Max_nb_of_PCI_Express_Lanes";
    pub const TEMPERATURE: &str = "T";
    pub const HYPER_THREADING: &str = "Intel_Hyper_Threading_Technology_";
    pub const VIRTUALIZATION: &str = "Intel_Virtualization_Technology_VTx_";
    pub const INTEL_64: &str = "Intel_64_";
    pub const INSTRUCTION_SET: &str = "Instruction_Set";
    pub const INSTRUCTION_SET_EXTENSIONS: &str = "Instruction_Set_Extensions";
    pub const IDLE_STATES: &str = "Idle_States";
    pub const THERMAL_MONITORING: &str = "Thermal_Monitoring_Technologies";
    pub const SECURE_KEY: &str = "Secure_Key";
    pub const EXECUTE_DISABLE_BIT: &str = "Execute_Disable_Bit";

    // Derived
    pub const CACHE_SIZE: &str = "Cache_Size";
    pub const CACHE_TYPE: &str = "Cache_Type";
    pub const BUS_TYPE: &str = "Bus_Type";
}

use columns::*;

/// Columns too sparse or uninformative to keep
pub const DROPPED_COLUMNS: &[&str] = &[
    PROCESSOR_NUMBER,
    LAUNCH_DATE,
    MAX_TURBO_FREQUENCY,
    PROCESSOR_GRAPHICS,
    GRAPHICS_BASE_FREQUENCY,
    GRAPHICS_MAX_FREQUENCY,
    GRAPHICS_VIDEO_MEMORY,
    GRAPHICS_OUTPUT,
    SUPPORT_4K,
    MAX_RESOLUTION_HDMI,
    MAX_RESOLUTION_DP,
    MAX_RESOLUTION_EDP,
    DIRECTX,
    OPENGL,
    PCIE_CONFIGURATIONS,
    SECURE_KEY,
];

/// Yes/No feature flags
pub const FLAG_COLUMNS: &[&str] = &[
    EMBEDDED_OPTIONS,
    CONFLICT_FREE,
    ECC_MEMORY,
    HYPER_THREADING,
    VIRTUALIZATION,
    INTEL_64,
    IDLE_STATES,
    THERMAL_MONITORING,
    EXECUTE_DISABLE_BIT,
];

/// Count columns interpolated by row order, then cast to integer
pub const INTEGER_COUNT_COLUMNS: &[&str] = &[CORES, THREADS];

/// Count columns filled with their mode only
pub const MODE_FILLED_COLUMNS: &[&str] = &[MEMORY_CHANNELS, PCIE_LANES];

/// Categorical columns replaced by label codes in the final stage
pub const LABEL_ENCODED_COLUMNS: &[&str] = &[
    PRODUCT_COLLECTION,
    LITHOGRAPHY,
    CACHE_TYPE,
    BUS_TYPE,
    PRICE,
];

/// Every input column of the processor table, in file order
pub const INPUT_COLUMNS: &[&str] = &[
    PRODUCT_COLLECTION,
    PROCESSOR_NUMBER,
    STATUS,
    LAUNCH_DATE,
    LITHOGRAPHY,
    PRICE,
    CORES,
    THREADS,
    BASE_FREQUENCY,
    MAX_TURBO_FREQUENCY,
    CACHE,
    BUS_SPEED,
    TDP,
    EMBEDDED_OPTIONS,
    CONFLICT_FREE,
    MAX_MEMORY_SIZE,
    MEMORY_TYPES,
    MEMORY_CHANNELS,
    MEMORY_BANDWIDTH,
    ECC_MEMORY,
    PROCESSOR_GRAPHICS,
    GRAPHICS_BASE_FREQUENCY,
    GRAPHICS_MAX_FREQUENCY,
    GRAPHICS_VIDEO_MEMORY,
    GRAPHICS_OUTPUT,
    SUPPORT_4K,
    MAX_RESOLUTION_HDMI,
    MAX_RESOLUTION_DP,
    MAX_RESOLUTION_EDP,
    DIRECTX,
    OPENGL,
    PCIE_REVISION,
    PCIE_CONFIGURATIONS,
    PCIE_LANES,
    TEMPERATURE,
    HYPER_THREADING,
    VIRTUALIZATION,
    INTEL_64,
    INSTRUCTION_SET,
    INSTRUCTION_SET_EXTENSIONS,
    IDLE_STATES,
    THERMAL_MONITORING,
    SECURE_KEY,
    EXECUTE_DISABLE_BIT,
];

/// Fail on the first column the feature stages read that `df` lacks
pub fn check_rule_columns(df: &DataFrame) -> Result<()> {
    let present: Vec<&str> = df.get_column_names().into_iter().map(|c| c.as_str()).collect();
    match INPUT_COLUMNS
        .iter()
        .filter(|col| !DROPPED_COLUMNS.contains(*col))
        .find(|col| !present.contains(*col))
    {
        Some(missing) => Err(SegmentError::SchemaViolation(missing.to_string())),
        None => Ok(()),
    }
}

/// Declared input and target columns of a raw record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub input_columns: Vec<String>,
    pub target_column: String,
}

/// On-disk shape of a specifications file
#[derive(Deserialize)]
struct SpecificationFile {
    description: Description,
}

#[derive(Deserialize)]
struct Description {
    #[serde(rename = "X")]
    x: Vec<String>,
    #[serde(rename = "y")]
    y: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            input_columns: INPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            target_column: VERTICAL_SEGMENT.to_string(),
        }
    }
}

impl FeatureSchema {
    /// Create a schema from explicit column lists
    pub fn new(input_columns: Vec<String>, target_column: impl Into<String>) -> Self {
        Self {
            input_columns,
            target_column: target_column.into(),
        }
    }

    /// Parse a specifications document of the form `{"description": {"X": [...], "y": "..."}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: SpecificationFile = serde_json::from_str(json)?;
        if spec.description.x.is_empty() {
            return Err(SegmentError::ConfigError(
                "specification declares no input columns".to_string(),
            ));
        }
        Ok(Self::new(spec.description.x, spec.description.y))
    }

    /// Load a specifications file from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Fail on the first declared input column the frame does not carry
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        let present: Vec<&str> = df.get_column_names().into_iter().map(|c| c.as_str()).collect();
        match self
            .input_columns
            .iter()
            .find(|col| !present.contains(&col.as_str()))
        {
            Some(missing) => Err(SegmentError::SchemaViolation(missing.clone())),
            None => Ok(()),
        }
    }

    /// Copy only the declared input columns out of `df`
    pub fn select_inputs(&self, df: &DataFrame) -> Result<DataFrame> {
        self.validate(df)?;
        Ok(df.select(self.input_columns.iter().map(|c| c.as_str()))?)
    }
}

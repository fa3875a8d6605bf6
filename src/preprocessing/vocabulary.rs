//! Enumerated vocabularies and mapping tables
//!
//! Free-form cells are decoded by testing them against a fixed token list.
//! The lists live here as named constants so they can be checked on their own.

use crate::schema::columns;

/// Bus types recognised as the last token of a bus descriptor
pub const BUS_TYPES: &[&str] = &["QPI", "DMI", "FSB", "DMI3", "PCIE"];

/// PCI Express revision tokens in match priority order
pub const PCIE_REVISIONS: &[(&str, f64)] = &[("3", 3.0), ("2", 2.0), ("1", 1.0), ("No", 0.0)];

/// Lifecycle status mapped onto old (0) and current (1)
pub const STATUS_CODES: &[(&str, f64)] = &[
    ("End of Interactive Support", 0.0),
    ("End of Life", 0.0),
    ("Launched", 1.0),
    ("Announced", 1.0),
];

/// Yes/No flag values
pub const FLAG_CODES: &[(&str, f64)] = &[("Yes", 1.0), ("No", 0.0)];

/// Token list for one multi-valued column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vocabulary {
    /// Composite column the tokens are matched against
    pub source: &'static str,
    pub tokens: &'static [&'static str],
}

/// Instruction set extensions, e.g. `"SSE4.1/4.2, AVX 2.0"`
pub const INSTRUCTION_SET_EXTENSIONS: Vocabulary = Vocabulary {
    source: columns::INSTRUCTION_SET_EXTENSIONS,
    tokens: &["SSE", "SSE2", "SSE3", "SSSE3", "SSE4", "AVX", "MMX", "AES", "IMCI", "AV2"],
};

/// Supported memory types, e.g. `"DDR4-2400, LPDDR3-1866"`
pub const MEMORY_TYPES: Vocabulary = Vocabulary {
    source: columns::MEMORY_TYPES,
    tokens: &["DDR4", "DDR3", "DDR3L", "DDR2", "LPDDR3"],
};

/// Multi-valued columns expanded into indicator columns
pub const MULTI_VALUED: &[Vocabulary] = &[INSTRUCTION_SET_EXTENSIONS, MEMORY_TYPES];

impl Vocabulary {
    /// One indicator per token: 1 if the token occurs in the cell, else 0
    pub fn indicators(&self, cell: Option<&str>) -> Vec<i64> {
        self.tokens
            .iter()
            .map(|token| cell.is_some_and(|c| c.contains(token)) as i64)
            .collect()
    }
}

/// Look up a cell in a mapping table
pub fn lookup(table: &[(&str, f64)], value: &str) -> Option<f64> {
    table.iter().find(|(key, _)| *key == value).map(|(_, code)| *code)
}

//! Per-column cell parsers
//!
//! Each parser maps one raw cell onto a typed value. A missing cell maps to a
//! missing value, never to an error. Cells outside a parser's lexical form are
//! rejected with a [`ParseError`].

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::vocabulary::{BUS_TYPES, PCIE_REVISIONS};

/// Why a cell could not be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown unit {unit:?}")]
    UnknownUnit { unit: String },

    #[error("expected {expected}, got {value:?}")]
    Malformed { value: String, expected: &'static str },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// A numeric reading that may be absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Missing,
    Number(f64),
}

impl From<Reading> for Option<f64> {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::Missing => None,
            Reading::Number(v) => Some(v),
        }
    }
}

/// Cache size and level decoded from a descriptor such as `"6 MB SmartCache"`
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSpec {
    pub size_mb: f64,
    pub kind: String,
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+").unwrap());
static CACHE_DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)\s(\w+)\s(.*)").unwrap());

/// Separators that mark a temperature cell as a list of readings
const READING_SEPARATORS: [char; 3] = [',', ';', '='];

/// Literal stand-in some exports write for an empty cell
pub const MISSING_MARKER: &str = "nan";

/// A finite number; `nan` and `inf` spellings are rejected
fn number(raw: &str) -> Result<f64, ParseError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber(raw.to_string()))
}

/// A bare number cell; any `nan` spelling is a missing value
pub fn parse_number(raw: &str) -> Result<Option<f64>, ParseError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        _ => number(raw).map(Some),
    }
}

/// Whether a cell holds the literal missing marker
pub fn is_missing_marker(raw: &str) -> bool {
    raw.trim() == MISSING_MARKER
}

/// Split `"<value> <unit>"` and scale the value by the unit's multiplier
fn scaled_quantity(raw: &str, units: &[(&str, f64)], expected: &'static str) -> Result<f64, ParseError> {
    let parts: Vec<&str> = raw.split(' ').collect();
    let [value, unit] = parts.as_slice() else {
        return Err(ParseError::Malformed {
            value: raw.to_string(),
            expected,
        });
    };
    let multiplier = units
        .iter()
        .find(|(name, _)| name == unit)
        .map(|(_, m)| *m)
        .ok_or_else(|| ParseError::UnknownUnit {
            unit: unit.to_string(),
        })?;
    Ok(number(value)? * multiplier)
}

/// Price from `"<low> - <high>"` (rounded midpoint) or a plain number.
///
/// Currency symbols and thousands separators must already be stripped.
pub fn parse_price(raw: &str) -> Result<f64, ParseError> {
    if raw.contains(" - ") {
        let bounds: Vec<&str> = raw.split('-').collect();
        let [low, high] = bounds.as_slice() else {
            return Err(ParseError::Malformed {
                value: raw.to_string(),
                expected: "a `<low> - <high>` range",
            });
        };
        return Ok(((number(low)? + number(high)?) / 2.0).round_ties_even());
    }
    number(raw)
}

/// Strip currency symbol and thousands separators from a price cell
pub fn clean_price(raw: &str) -> String {
    raw.replace(['$', ','], "")
}

/// Frequency in GHz from `"<value> GHz"` or `"<value> MHz"`
pub fn parse_frequency(raw: &str) -> Result<f64, ParseError> {
    scaled_quantity(raw, &[("GHz", 1.0), ("MHz", 0.001)], "`<value> <GHz|MHz>`")
}

/// Cache size in MB and cache level.
///
/// A two-token descriptor such as `"8 MB"` names an L3 cache.
pub fn parse_cache(raw: Option<&str>) -> Result<Option<CacheSpec>, ParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let descriptor = if raw.matches(' ').count() == 1 {
        format!("{raw} L3")
    } else {
        raw.to_string()
    };

    let caps = CACHE_DESCRIPTOR
        .captures(&descriptor)
        .ok_or_else(|| ParseError::Malformed {
            value: raw.to_string(),
            expected: "`<value> <MB|KB> <cache type>`",
        })?;
    let multiplier = match &caps[2] {
        "MB" => 1.0,
        "KB" => 0.001,
        unit => {
            return Err(ParseError::UnknownUnit {
                unit: unit.to_string(),
            })
        }
    };

    Ok(Some(CacheSpec {
        size_mb: number(&caps[1])? * multiplier,
        kind: caps[3].to_string(),
    }))
}

/// Bus type named by the last token of a bus descriptor, if it is a known one
pub fn parse_bus_type(raw: Option<&str>) -> Option<String> {
    let last = raw?.split(' ').last()?.trim();
    BUS_TYPES.contains(&last).then(|| last.to_string())
}

/// Memory size in GB from `"<value> GB"` or `"<value> TB"`
pub fn parse_memory_size(raw: Option<&str>) -> Result<Option<f64>, ParseError> {
    raw.map(|r| scaled_quantity(r, &[("GB", 1.0), ("TB", 1024.0)], "`<value> <GB|TB>`"))
        .transpose()
}

/// Number left after removing every occurrence of `unit`, e.g. `"65 W"`
pub fn parse_with_unit(raw: Option<&str>, unit: &str) -> Result<Option<f64>, ParseError> {
    raw.map(|r| parse_number(&r.replace(unit, "")))
        .transpose()
        .map(Option::flatten)
}

/// Temperature reading.
///
/// A cell listing several readings (separated by `,`, `;` or `=`) yields the
/// largest; otherwise the first number in the cell.
pub fn parse_temperature(raw: Option<&str>) -> Reading {
    let Some(raw) = raw.filter(|r| !is_missing_marker(r)) else {
        return Reading::Missing;
    };

    let mut readings = NUMBER
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    let value = if raw.contains(READING_SEPARATORS) {
        readings.reduce(f64::max)
    } else {
        readings.next()
    };

    value.map_or(Reading::Missing, Reading::Number)
}

/// PCI Express revision, matched by the first revision token the cell contains
pub fn parse_pcie_revision(raw: &str) -> Option<f64> {
    PCIE_REVISIONS
        .iter()
        .find(|(token, _)| raw.contains(token))
        .map(|(_, revision)| *revision)
}

/// 1 for a 64-bit instruction set, 0 for 32-bit, missing otherwise
pub fn parse_instruction_width(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    if raw.contains("64") {
        Some(1.0)
    } else if raw.contains("32") {
        Some(0.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_nan_is_missing() {
        assert_eq!(parse_number(" 65 "), Ok(Some(65.0)));
        assert_eq!(parse_number("nan"), Ok(None));
        assert_eq!(parse_number("NaN"), Ok(None));
        assert!(matches!(parse_number("inf"), Err(ParseError::InvalidNumber(_))));
        assert!(matches!(parse_number("-infinity"), Err(ParseError::InvalidNumber(_))));
    }

    #[test]
    fn test_non_finite_units_rejected() {
        assert_eq!(parse_with_unit(Some("nan W"), "W"), Ok(None));
        assert!(parse_with_unit(Some("inf W"), "W").is_err());
        assert!(parse_frequency("inf GHz").is_err());
        assert!(parse_price("nan").is_err());
    }

    #[test]
    fn test_price_range_midpoint() {
        assert_eq!(parse_price("100 - 200").unwrap(), 150.0);
        // round half to even
        assert_eq!(parse_price("1 - 2").unwrap(), 2.0);
        assert_eq!(parse_price("2 - 3").unwrap(), 2.0);
    }

    #[test]
    fn test_price_plain_number() {
        assert_eq!(parse_price("303.50").unwrap(), 303.5);
        assert_eq!(parse_price(&clean_price("$1,999.00")).unwrap(), 1999.0);
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert!(matches!(parse_price("N/A"), Err(ParseError::InvalidNumber(_))));
        assert!(parse_price("1 - 2 - 3").is_err());
    }

    #[test]
    fn test_frequency_units() {
        assert_eq!(parse_frequency("1.2 GHz").unwrap(), 1.2);
        assert!((parse_frequency("800 MHz").unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_unknown_unit() {
        assert_eq!(
            parse_frequency("3 THz"),
            Err(ParseError::UnknownUnit { unit: "THz".to_string() })
        );
        assert!(matches!(parse_frequency("3GHz"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_cache_two_token_form_is_l3() {
        let spec = parse_cache(Some("8 MB")).unwrap().unwrap();
        assert_eq!(spec, CacheSpec { size_mb: 8.0, kind: "L3".to_string() });
    }

    #[test]
    fn test_cache_three_token_form() {
        let spec = parse_cache(Some("6 MB SmartCache")).unwrap().unwrap();
        assert_eq!(spec.size_mb, 6.0);
        assert_eq!(spec.kind, "SmartCache");

        let spec = parse_cache(Some("512 KB L2")).unwrap().unwrap();
        assert!((spec.size_mb - 0.512).abs() < 1e-12);
        assert_eq!(spec.kind, "L2");
    }

    #[test]
    fn test_cache_missing_and_malformed() {
        assert_eq!(parse_cache(None).unwrap(), None);
        assert!(matches!(parse_cache(Some("8 GB L3")), Err(ParseError::UnknownUnit { .. })));
        assert!(matches!(parse_cache(Some("SmartCache")), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_bus_type() {
        assert_eq!(parse_bus_type(Some("4.8 GT/s DMI3")), Some("DMI3".to_string()));
        assert_eq!(parse_bus_type(Some("5 GT/s DMI")), Some("DMI".to_string()));
        assert_eq!(parse_bus_type(Some("Fake Bus")), None);
        assert_eq!(parse_bus_type(None), None);
    }

    #[test]
    fn test_memory_size() {
        assert_eq!(parse_memory_size(Some("1 TB")).unwrap(), Some(1024.0));
        assert_eq!(parse_memory_size(Some("8 GB")).unwrap(), Some(8.0));
        assert_eq!(parse_memory_size(None).unwrap(), None);
        assert!(parse_memory_size(Some("8 PB")).is_err());
    }

    #[test]
    fn test_with_unit() {
        assert_eq!(parse_with_unit(Some("65 W"), "W").unwrap(), Some(65.0));
        assert_eq!(parse_with_unit(Some("25.6 GB/s"), "GB/s").unwrap(), Some(25.6));
        assert_eq!(parse_with_unit(None, "W").unwrap(), None);
    }

    #[test]
    fn test_temperature_list_takes_max() {
        assert_eq!(parse_temperature(Some("-40, 100")), Reading::Number(100.0));
        assert_eq!(parse_temperature(Some("B0=72.7°C; C0=68°C")), Reading::Number(72.7));
    }

    #[test]
    fn test_temperature_single_value() {
        assert_eq!(parse_temperature(Some("100°C")), Reading::Number(100.0));
        assert_eq!(parse_temperature(Some("72.72")), Reading::Number(72.72));
    }

    #[test]
    fn test_temperature_missing() {
        assert_eq!(parse_temperature(None), Reading::Missing);
        assert_eq!(parse_temperature(Some("nan")), Reading::Missing);
        assert_eq!(parse_temperature(Some("unknown")), Reading::Missing);
        assert_eq!(parse_temperature(Some("n/a; n/a")), Reading::Missing);
    }

    #[test]
    fn test_pcie_revision_priority() {
        assert_eq!(parse_pcie_revision("3.0"), Some(3.0));
        assert_eq!(parse_pcie_revision("2.0 and 3.0"), Some(3.0));
        assert_eq!(parse_pcie_revision("Gen 2"), Some(2.0));
        assert_eq!(parse_pcie_revision("1.1"), Some(1.0));
        assert_eq!(parse_pcie_revision("No"), Some(0.0));
        assert_eq!(parse_pcie_revision("Yes"), None);
    }

    #[test]
    fn test_instruction_width() {
        assert_eq!(parse_instruction_width(Some("64-bit")), Some(1.0));
        assert_eq!(parse_instruction_width(Some("32-bit")), Some(0.0));
        assert_eq!(parse_instruction_width(Some("Itanium")), None);
        assert_eq!(parse_instruction_width(None), None);
    }

    #[test]
    fn test_reading_into_option() {
        let v: Option<f64> = Reading::Number(1.5).into();
        assert_eq!(v, Some(1.5));
        let m: Option<f64> = Reading::Missing.into();
        assert_eq!(m, None);
    }
}

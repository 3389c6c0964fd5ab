//! Type inference for raw cell strings
//!
//! A remote cell arrives as a display string plus an optional numeric
//! companion. [`infer`] folds the two into a typed value and a [`CellType`].
//! The probe order is fixed: formula, datetime, date, number, time, string.
//! Dates are probed before numbers and numbers before times, because the
//! patterns overlap for some inputs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::Formats;
use crate::value::{CellType, CellValue};

/// Unsigned decimal: digits with at most one point, at least one digit.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("valid numeric regex"));

/// Result of classifying one raw cell
#[derive(Debug, Clone, PartialEq)]
pub struct Inferred {
    /// Typed value, absent only for formulas without a result
    pub value: Option<CellValue>,
    /// Type tag
    pub cell_type: CellType,
}

/// Whether `raw` is a plain unsigned decimal number
pub fn is_numeric(raw: &str) -> bool {
    NUMERIC.is_match(raw)
}

/// Whether a display string denotes a formula
pub fn is_formula(raw: &str) -> bool {
    raw.starts_with('=')
}

/// Classify a raw display string and its numeric companion.
///
/// Never fails: anything that matches no other rule is a string.
pub fn infer(display: Option<&str>, numeric: Option<&str>, formats: &Formats) -> Inferred {
    let raw = match display {
        Some(raw) if !is_formula(raw) => raw,
        _ => {
            let value = numeric.map(|n| match n.parse::<f64>() {
                Ok(f) if is_numeric(n) => CellValue::Float(f),
                _ => CellValue::string(n),
            });
            return Inferred {
                value,
                cell_type: CellType::Formula,
            };
        }
    };

    if let Some(dt) = formats.parse_datetime(raw) {
        return Inferred {
            value: Some(CellValue::DateTime(dt)),
            cell_type: CellType::DateTime,
        };
    }

    if let Some(d) = formats.parse_date(raw) {
        return Inferred {
            value: Some(CellValue::Date(d)),
            cell_type: CellType::Date,
        };
    }

    if is_numeric(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return Inferred {
                value: Some(CellValue::Float(n)),
                cell_type: CellType::Float,
            };
        }
    }

    if let Some(secs) = formats.parse_time(raw) {
        return Inferred {
            value: Some(CellValue::Time(secs)),
            cell_type: CellType::Time,
        };
    }

    Inferred {
        value: Some(CellValue::string(raw)),
        cell_type: CellType::String,
    }
}

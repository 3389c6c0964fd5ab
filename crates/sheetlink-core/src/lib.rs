//! # sheetlink-core
//!
//! I/O-free building blocks for the sheetlink cell access layer:
//! - [`normalize`] and [`CellCoord`] - coordinate normalization
//! - [`CellValue`] and [`CellType`] - typed cell values and their tags
//! - [`Formats`] - the date/time/datetime patterns a workbook handle carries
//! - [`infer`] - classification of raw cell strings
//!
//! ## Example
//!
//! ```rust
//! use sheetlink_core::{infer, normalize, CellType, CellValue, Formats};
//!
//! let coord = normalize(2, "b").unwrap();
//! assert_eq!(coord.to_string(), "B2");
//!
//! let formats = Formats::default();
//! let inferred = infer(Some("=A1*2"), Some("84"), &formats);
//! assert_eq!(inferred.cell_type, CellType::Formula);
//! assert_eq!(inferred.value, Some(CellValue::Float(84.0)));
//! ```

pub mod coord;
pub mod error;
pub mod format;
pub mod infer;
pub mod value;

// Re-exports for convenience
pub use coord::{column_to_letters, letters_to_column, normalize, Axis, CellCoord};
pub use error::{Error, Result};
pub use format::{
    Formats, TemporalKind, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT,
};
pub use infer::{infer, is_formula, is_numeric, Inferred};
pub use value::{CellType, CellValue};

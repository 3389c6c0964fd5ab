//! The remote store seam.
//!
//! A [`RemoteStore`] is whatever client wraps the actual remote service. The
//! workbook handle only ever talks to it through this trait, one blocking
//! call at a time. Sheet indices, rows and columns are all 1-based.

mod csv_dir;
mod memory;

pub use self::csv_dir::{CsvStore, CsvStoreOptions};
pub use self::memory::{CallCounts, MemorySheet, MemoryStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No remote session: access credential missing")]
    NoSession,

    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("Sheet index {0} out of range (count: {1})")]
    SheetIndex(u32, usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Blocking access to a remote, sheet-structured document.
pub trait RemoteStore {
    /// Names of all sheets, in document order.
    fn list_sheets(&mut self) -> StoreResult<Vec<String>>;

    /// `(rows, cols)` of the sheet's used rectangle.
    fn sheet_extent(&mut self, sheet: u32) -> StoreResult<(u32, u32)>;

    /// The cell's display (input) string. `None` when the store cannot
    /// provide one; blank cells are `Some("")`.
    fn read_display_string(&mut self, sheet: u32, row: u32, col: u32)
        -> StoreResult<Option<String>>;

    /// The cell's numeric companion, as the raw text the store reports.
    fn read_numeric_value(&mut self, sheet: u32, row: u32, col: u32)
        -> StoreResult<Option<String>>;

    /// Stage a new raw value for a cell. Formula strings are sent verbatim.
    fn write_cell(&mut self, sheet: u32, row: u32, col: u32, value: &str) -> StoreResult<()>;

    /// Commit staged writes for a sheet.
    fn persist(&mut self, sheet: u32) -> StoreResult<()>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    fn list_sheets(&mut self) -> StoreResult<Vec<String>> {
        (**self).list_sheets()
    }

    fn sheet_extent(&mut self, sheet: u32) -> StoreResult<(u32, u32)> {
        (**self).sheet_extent(sheet)
    }

    fn read_display_string(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        (**self).read_display_string(sheet, row, col)
    }

    fn read_numeric_value(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        (**self).read_numeric_value(sheet, row, col)
    }

    fn write_cell(&mut self, sheet: u32, row: u32, col: u32, value: &str) -> StoreResult<()> {
        (**self).write_cell(sheet, row, col, value)
    }

    fn persist(&mut self, sheet: u32) -> StoreResult<()> {
        (**self).persist(sheet)
    }
}

/// Numeric companion a plain store derives from a raw string.
///
/// Formulas have no computed result in stores that cannot evaluate them.
pub(crate) fn numeric_companion(raw: &str) -> Option<String> {
    if sheetlink_core::is_formula(raw) {
        return None;
    }
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|_| raw.trim().to_string())
}

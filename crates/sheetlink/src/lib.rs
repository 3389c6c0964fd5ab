//! Cell-oriented access to remote, sheet-structured documents.
//!
//! A [`Workbook`] wraps any [`RemoteStore`] and hides its cost behind a
//! lazily filled, per-sheet cache. Raw cell strings are classified into
//! strings, numbers, dates, times, datetimes and formulas on the way in.
//!
//! # Architecture
//!
//! ```text
//! Your Rust code
//!     └── Workbook (cache, bounds, write-through)
//!           └── RemoteStore (MemoryStore, CsvStore, Session<S>, or your own client)
//!                 └── the remote document
//! ```
//!
//! # Example
//!
//! ```rust
//! use sheetlink::{CellValue, MemorySheet, MemoryStore, Workbook};
//!
//! # fn example() -> sheetlink::Result<()> {
//! let store = MemoryStore::new().with_sheet(MemorySheet::new("Prices").with_value(1, 1, "9.99"));
//! let mut wb = Workbook::new(store);
//!
//! assert_eq!(wb.cell(1, "A", Some("Prices"))?, Some(CellValue::Float(9.99)));
//!
//! wb.set(2, "A", "=A1*2", Some("Prices"))?;
//! assert_eq!(wb.formula(2, "A", Some("Prices"))?.as_deref(), Some("=A1*2"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod cache;
pub mod error;
pub mod session;
pub mod store;
pub mod workbook;

pub use cache::{CachedCell, SheetCache};
pub use error::{Error, Result};
pub use session::{Session, SessionConfig, ACCESS_TOKEN_ENV};
pub use store::{
    CallCounts, CsvStore, CsvStoreOptions, MemorySheet, MemoryStore, RemoteStore, StoreError,
    StoreResult,
};
pub use workbook::{SheetBounds, Workbook};

pub use sheetlink_core::{
    normalize, Axis, CellCoord, CellType, CellValue, Formats, TemporalKind,
};

//! Error types for sheetlink.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sheetlink_core::Error),

    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("Workbook has no sheets")]
    NoSheets,
}

pub type Result<T> = std::result::Result<T, Error>;

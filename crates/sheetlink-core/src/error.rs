//! Error types for sheetlink-core

use thiserror::Error;

use crate::coord::CellCoord;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetlink-core
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed row or column input
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A cached date/datetime string no longer parses under the current pattern
    #[error("Sheet '{sheet}', cell {coord}: value '{raw}' does not match pattern '{pattern}'")]
    FormatMismatch {
        sheet: String,
        coord: CellCoord,
        raw: String,
        pattern: String,
    },
}

impl Error {
    /// Create an [`Error::InvalidCoordinate`] with a message
    pub fn invalid_coordinate<S: Into<String>>(msg: S) -> Self {
        Error::InvalidCoordinate(msg.into())
    }
}

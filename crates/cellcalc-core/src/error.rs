//! Error types for cellcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellcalc-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell label format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row number (1-based, as written in the label) out of bounds
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(String, u32),

    /// Column letters out of bounds
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(String, String),
}

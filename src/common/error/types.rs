//! Crate-level error type.
use crate::ooxml::xlsb::XlsbError;
use thiserror::Error;

/// Main error type for reader operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The binary container is malformed (truncated record, overrun field, bad varint)
    #[error("Malformed container: {0}")]
    Xlsb(#[from] XlsbError),

    /// A part the workbook refers to could not be found
    #[error("Component not found: {0}")]
    MissingPart(String),

    /// Cell data was requested while no row is materialized
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An argument is outside the range the current worksheet allows
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The cell holds a value of a different type than requested
    #[error("Invalid cast: column {column} does not hold a {expected} value")]
    InvalidCast {
        column: usize,
        expected: &'static str,
    },

    /// The operation has no meaning for a forward-only tabular cursor
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The reader has been closed
    #[error("Reader is closed")]
    Closed,
}

impl Error {
    /// Whether this error signals malformed input rather than caller misuse.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Xlsb(e) if e.is_malformed())
    }
}

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, Error>;

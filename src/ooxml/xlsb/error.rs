//! Error types for XLSB record decoding

use crate::common::binary::BinaryError;
use thiserror::Error;

/// Result type alias for XLSB operations
pub type XlsbResult<T> = Result<T, XlsbError>;

/// Errors that can occur while decoding an XLSB record stream.
///
/// Every variant except [`XlsbError::Io`] describes a malformed container.
#[derive(Error, Debug)]
pub enum XlsbError {
    /// I/O error from the underlying byte source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended in the middle of a record
    #[error("Unexpected end of stream: {0}")]
    Truncated(&'static str),

    /// A variable-length header field used more than four bytes
    #[error("Invalid {field} varint: more than 4 bytes")]
    InvalidLength {
        /// Which header field was being read
        field: &'static str,
    },

    /// A payload field lies beyond the end of its record
    #[error("Record 0x{record_type:04X}: {source}")]
    Overrun {
        /// Tag of the record being decoded
        record_type: u32,
        /// The failed bounds check
        source: BinaryError,
    },

    /// A bounds check failed outside of a tagged record
    #[error("{0}")]
    Binary(#[from] BinaryError),
}

impl XlsbError {
    /// Whether this error means the container bytes themselves are bad.
    pub fn is_malformed(&self) -> bool {
        match self {
            XlsbError::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => true,
        }
    }

    /// Attach the record tag to a field-level failure.
    pub(crate) fn in_record(self, record_type: u32) -> Self {
        match self {
            XlsbError::Binary(source) => XlsbError::Overrun {
                record_type,
                source,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_record_tags_binary_errors() {
        let err = XlsbError::from(BinaryError::InsufficientData {
            expected: 12,
            available: 8,
        })
        .in_record(0x9C);
        assert!(matches!(err, XlsbError::Overrun { record_type: 0x9C, .. }));
        assert!(err.to_string().contains("0x009C"));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_io_error_classification() {
        let other = XlsbError::Io(std::io::Error::other("disk gone"));
        assert!(!other.is_malformed());
        let eof = XlsbError::Io(std::io::ErrorKind::UnexpectedEof.into());
        assert!(eof.is_malformed());
    }
}

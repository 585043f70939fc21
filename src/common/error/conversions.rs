//! Error conversion implementations.
//!
//! Lower-level error types funnel into [`Error`] through the decoder's
//! [`XlsbError`], so a bad field read anywhere surfaces as a malformed
//! container.

use super::types::Error;
use crate::common::binary::BinaryError;
use crate::ooxml::xlsb::XlsbError;

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        Error::Xlsb(XlsbError::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Xlsb(XlsbError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_error_is_malformed() {
        let err: Error = BinaryError::InsufficientData {
            expected: 8,
            available: 4,
        }
        .into();
        assert!(err.is_malformed());
        assert!(err.to_string().starts_with("Malformed container"));
    }

    #[test]
    fn test_misuse_is_not_malformed() {
        assert!(!Error::InvalidState("no row".to_string()).is_malformed());
        assert!(!Error::Closed.is_malformed());
    }
}

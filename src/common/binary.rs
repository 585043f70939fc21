//! Binary data parsing utilities shared across record decoders.
//!
//! Every read is bounds-checked against the slice it is given. A read that
//! would cross the end of the buffer fails with
//! [`BinaryError::InsufficientData`] instead of truncating or touching bytes
//! that belong to the next record.

use encoding_rs::UTF_16LE;
use thiserror::Error;
use zerocopy::{F64, FromBytes, LE, U16, U32};

/// Binary parsing error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    #[error("Insufficient data: expected {expected}, got {available}")]
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn slice_at(data: &[u8], offset: usize, len: usize) -> BinaryResult<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| BinaryError::ParseError(format!("offset {} overflows", offset)))?;
    data.get(offset..end).ok_or(BinaryError::InsufficientData {
        expected: end,
        available: data.len(),
    })
}

/// Read a single byte at the given offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> BinaryResult<u8> {
    data.get(offset).copied().ok_or(BinaryError::InsufficientData {
        expected: offset.saturating_add(1),
        available: data.len(),
    })
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use xlsb_cursor::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// assert!(read_u16_le(&data, 3).is_err());
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    U16::<LE>::read_from_bytes(slice_at(data, offset, 2)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a little-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use xlsb_cursor::common::binary::read_u32_le;
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    U32::<LE>::read_from_bytes(slice_at(data, offset, 4)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u32".to_string()))
}

/// Read a little-endian f64 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use xlsb_cursor::common::binary::read_f64_le;
/// let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F];
/// assert!((read_f64_le(&data, 0).unwrap() - 1.0).abs() < f64::EPSILON);
/// ```
#[inline]
pub fn read_f64_le(data: &[u8], offset: usize) -> BinaryResult<f64> {
    F64::<LE>::read_from_bytes(slice_at(data, offset, 8)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read f64".to_string()))
}

/// Decode exactly `char_count` UTF-16LE code units starting at `offset`.
///
/// The whole declared range must lie inside `data`.
///
/// # Examples
///
/// ```
/// use xlsb_cursor::common::binary::read_utf16le;
/// let data = [0x48, 0x00, 0x69, 0x00];
/// assert_eq!(read_utf16le(&data, 0, 2).unwrap(), "Hi");
/// assert!(read_utf16le(&data, 0, 3).is_err());
/// ```
pub fn read_utf16le(data: &[u8], offset: usize, char_count: usize) -> BinaryResult<String> {
    let byte_count = char_count
        .checked_mul(2)
        .ok_or_else(|| BinaryError::ParseError(format!("string length {} overflows", char_count)))?;
    let bytes = slice_at(data, offset, byte_count)?;
    Ok(UTF_16LE.decode_without_bom_handling(bytes).0.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_reject_out_of_bounds() {
        let data = [1u8, 2, 3];
        assert_eq!(
            read_u32_le(&data, 0),
            Err(BinaryError::InsufficientData {
                expected: 4,
                available: 3
            })
        );
        assert!(read_u8(&data, 3).is_err());
        assert!(read_f64_le(&data, 0).is_err());
        assert!(read_u16_le(&data, usize::MAX).is_err());
    }

    #[test]
    fn test_float_reads() {
        let bytes = 2.5f64.to_le_bytes();
        assert_eq!(read_f64_le(&bytes, 0).unwrap(), 2.5);
    }

    #[test]
    fn test_utf16_non_ascii() {
        let encoded: Vec<u8> = "Blätter".encode_utf16().flat_map(u16::to_le_bytes).collect();
        assert_eq!(read_utf16le(&encoded, 0, 7).unwrap(), "Blätter");
        assert_eq!(read_utf16le(&encoded, 2, 0).unwrap(), "");
    }

    #[test]
    fn test_utf16_length_overflow() {
        assert!(read_utf16le(&[0u8; 4], 0, usize::MAX).is_err());
    }
}

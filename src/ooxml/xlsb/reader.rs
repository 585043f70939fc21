//! BIFF12 record framing.
//!
//! [`BiffReader`] pulls one record at a time from any [`Read`]: a varint type,
//! a varint length, then exactly `length` payload bytes. The payload is handed
//! to a [`RecordDecoder`] chosen by the caller, so the same framing serves the
//! workbook, worksheet, styles and shared-string parts.

use crate::ooxml::xlsb::error::{XlsbError, XlsbResult};
use crate::ooxml::xlsb::records::Record;
use log::trace;
use std::io::{ErrorKind, Read};

/// Header varints are at most four bytes (28 significant bits).
const MAX_VARINT_BYTES: usize = 4;

/// Turns one record payload into a [`Record`].
pub trait RecordDecoder {
    /// Decode the payload of a record with tag `record_type`.
    ///
    /// Unrecognized tags must return [`Record::Ignored`]; framing has already
    /// consumed the payload, so the stream stays aligned.
    fn decode(&mut self, buffer: &[u8], record_type: u32, record_len: u32) -> XlsbResult<Record>;
}

/// Sequential record reader over a byte source
pub struct BiffReader<R, D> {
    reader: R,
    decoder: D,
    buffer: Vec<u8>,
    failed: bool,
}

impl<R: Read, D: RecordDecoder> BiffReader<R, D> {
    pub fn new(reader: R, decoder: D) -> Self {
        BiffReader {
            reader,
            decoder,
            buffer: Vec::with_capacity(256),
            failed: false,
        }
    }

    /// Read and decode the next record.
    ///
    /// Returns `Ok(None)` when the input ends cleanly on a record boundary.
    /// Any error leaves the reader failed; further calls return `Ok(None)`.
    pub fn read_record(&mut self) -> XlsbResult<Option<Record>> {
        if self.failed {
            return Ok(None);
        }
        let result = self.read_record_inner();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn read_record_inner(&mut self) -> XlsbResult<Option<Record>> {
        let Some(record_type) = self.read_varint("record type", true)? else {
            return Ok(None);
        };
        let record_len = self
            .read_varint("record length", false)?
            .ok_or(XlsbError::Truncated("record length"))?;

        // Grow with the data actually present rather than trusting the header.
        self.buffer.clear();
        let read = (&mut self.reader)
            .take(record_len as u64)
            .read_to_end(&mut self.buffer)?;
        if read < record_len as usize {
            return Err(XlsbError::Truncated("record payload"));
        }

        let record = self
            .decoder
            .decode(&self.buffer, record_type, record_len)
            .map_err(|e| e.in_record(record_type))?;
        if matches!(record, Record::Ignored) {
            trace!("skipping record 0x{:04X} ({} bytes)", record_type, record_len);
        }
        Ok(Some(record))
    }

    /// Read a 7-bit-per-byte varint with the high bit as continuation flag.
    ///
    /// `eof_ok` allows a clean end of input before the first byte.
    fn read_varint(&mut self, field: &'static str, eof_ok: bool) -> XlsbResult<Option<u32>> {
        let mut value = 0u32;
        for i in 0..MAX_VARINT_BYTES {
            let mut byte = [0u8; 1];
            let n = loop {
                match self.reader.read(&mut byte) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(XlsbError::Io(e)),
                }
            };
            if n == 0 {
                return if i == 0 && eof_ok {
                    Ok(None)
                } else {
                    Err(XlsbError::Truncated(field))
                };
            }
            value |= ((byte[0] & 0x7F) as u32) << (7 * i);
            if byte[0] & 0x80 == 0 {
                return Ok(Some(value));
            }
        }
        Err(XlsbError::InvalidLength { field })
    }

    /// Access the decoder, e.g. to inspect state it accumulated.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<R: Read, D: RecordDecoder> Iterator for BiffReader<R, D> {
    type Item = XlsbResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

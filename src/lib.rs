//! xlsb-cursor - streaming tabular reader for Excel Binary Workbooks
//!
//! This library decodes the BIFF12 record streams of `.xlsb` workbooks and
//! exposes them through a forward-only, multi-pass cursor in the style of a
//! database data reader.
//!
//! # Features
//!
//! - **Record decoder**: bounds-checked varint framing with pluggable
//!   per-part decoders
//! - **Lazy worksheets**: sheets are constructed on first use and rows are
//!   decoded on demand
//! - **Worksheet cache**: resetting the cursor replays constructed worksheets
//!   instead of decoding them again
//! - **Style resolution**: per-cell effective style and number format, with
//!   date detection for both 1900 and 1904 date systems
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use xlsb_cursor::ooxml::xlsb::{XlsbPackage, XlsbWorkbook};
//! use xlsb_cursor::sheet::{ReaderOptions, SheetReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Parts extracted from the .xlsb container by the caller
//! let package = XlsbPackage::new()
//!     .with_part("xl/workbook.bin", std::fs::read("unpacked/xl/workbook.bin")?)
//!     .with_part("xl/worksheets/sheet1.bin", std::fs::read("unpacked/xl/worksheets/sheet1.bin")?);
//! let relationships = HashMap::from([(
//!     "rId1".to_string(),
//!     "xl/worksheets/sheet1.bin".to_string(),
//! )]);
//!
//! let workbook = XlsbWorkbook::open(package, &relationships, ReaderOptions::default())?;
//! let mut reader = SheetReader::open(workbook)?;
//! while reader.read()? {
//!     println!("{:?}", reader.get_value(0)?);
//! }
//! # Ok(())
//! # }
//! ```

/// Shared binary helpers and the crate error type
pub mod common;

/// Binary workbook (BIFF12) decoding
pub mod ooxml;

/// Tabular model and the streaming cursor
pub mod sheet;

pub use common::{Error, Result};

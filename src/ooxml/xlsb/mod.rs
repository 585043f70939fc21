//! Excel Binary Workbook (.xlsb) reader
//!
//! The parts of an XLSB package are BIFF12 record streams. This module
//! decodes them into the models of [`crate::sheet`]:
//!
//! - **Framing**: [`BiffReader`] reads variable-length record headers and hands
//!   each payload to a [`RecordDecoder`].
//! - **Workbook**: sheet directory, 1904 date flag and active sheet; sheet
//!   relationship ids are resolved against a caller-supplied table.
//! - **Worksheets**: dimensions, column widths, merged cells, header/footer
//!   and a lazy row reader.
//! - **Styles and shared strings**: number formats, cell XFs and the SST,
//!   used to turn raw cell records into typed values.
//!
//! Malformed input (truncated records, over-long headers, fields past the end
//! of a payload) is always reported as an [`XlsbError`], never read around.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use xlsb_cursor::ooxml::xlsb::{XlsbPackage, XlsbWorkbook};
//! use xlsb_cursor::sheet::{ReaderOptions, Workbook};
//!
//! # fn main() -> xlsb_cursor::Result<()> {
//! let package = XlsbPackage::new().with_part("xl/workbook.bin", Vec::new());
//! let workbook = XlsbWorkbook::open(package, &HashMap::new(), ReaderOptions::default())?;
//! assert_eq!(workbook.results_count(), 0);
//! assert!(!workbook.is_1904());
//! # Ok(())
//! # }
//! ```
//!
//! # Reference
//!
//! - [MS-XLSB]: Excel Binary File Format (.xlsb) Structure Specification
//!   https://docs.microsoft.com/en-us/openspecs/office_file_formats/ms-xlsb/

/// Error types for XLSB parsing
mod error;

/// BIFF12 record framing
pub mod reader;

/// XLSB record model and field helpers
pub mod records;

/// Part access
mod package;

/// Workbook parsing implementation
mod workbook;

/// Worksheet parsing implementation
mod worksheet;

mod shared_strings;
mod styles_table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{XlsbError, XlsbResult};
pub use package::{PartProvider, XlsbPackage};
pub use reader::{BiffReader, RecordDecoder};
pub use records::{Record, record_types};
pub use shared_strings::{SharedStringTable, SharedStringsDecoder};
pub use styles_table::{StylesDecoder, StylesTable};
pub use workbook::{WorkbookDecoder, XlsbWorkbook, XlsbWorksheets};
pub use worksheet::{WorksheetDecoder, XlsbRows, XlsbWorksheet};

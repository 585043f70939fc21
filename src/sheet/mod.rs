//! Tabular access to workbooks.
//!
//! This module holds the format-independent half of the reader: the cell and
//! row model, the [`Workbook`]/[`Worksheet`] capabilities a container format
//! implements, and the [`SheetReader`] cursor that walks them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use xlsb_cursor::ooxml::xlsb::{XlsbPackage, XlsbWorkbook};
//! use xlsb_cursor::sheet::{ReaderOptions, SheetReader};
//!
//! # fn main() -> xlsb_cursor::Result<()> {
//! # let package = XlsbPackage::new();
//! let relationships = HashMap::from([(
//!     "rId1".to_string(),
//!     "xl/worksheets/sheet1.bin".to_string(),
//! )]);
//! let workbook = XlsbWorkbook::open(package, &relationships, ReaderOptions::default())?;
//! let mut reader = SheetReader::open(workbook)?;
//!
//! loop {
//!     println!("sheet {:?}", reader.name());
//!     while reader.read()? {
//!         for i in 0..reader.field_count() {
//!             print!("{:?}\t", reader.get_value(i)?);
//!         }
//!         println!();
//!     }
//!     if !reader.next_result()? {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod date;
pub mod options;
pub mod reader;
pub mod traits;
pub mod types;


pub use cache::WorksheetCache;
pub use options::ReaderOptions;
pub use reader::{DEFAULT_COLUMN_WIDTH, SheetReader};
pub use traits::{Workbook, Worksheet};
pub use types::{
    Cell, CellError, CellRange, CellStyle, CellValue, ColumnWidth, HeaderFooter,
    HorizontalAlignment, NumberFormatString, Row, SheetVisibility,
};

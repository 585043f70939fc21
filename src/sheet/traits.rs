//! Traits for spreadsheet abstraction.
//!
//! The cursor in [`super::reader`] only talks to these two capabilities, so
//! any container format that can produce worksheets and rows lazily can be
//! read through it.

use super::types::{CellRange, ColumnWidth, HeaderFooter, NumberFormatString, Row, SheetVisibility};
use crate::common::Result;

/// Represents a worksheet (sheet) in a workbook.
pub trait Worksheet {
    /// Lazy row sequence produced by [`Worksheet::read_rows`].
    type Rows: Iterator<Item = Result<Row>>;

    /// Position of this sheet in the workbook directory.
    ///
    /// Sheets the workbook could not produce are still counted, so this can
    /// differ from the sheet's position in the read order.
    fn sheet_index(&self) -> usize;

    /// Get the worksheet name.
    fn name(&self) -> &str;

    /// Get the VBA code name, if the sheet declares one.
    fn code_name(&self) -> Option<&str>;

    fn visible_state(&self) -> SheetVisibility;

    fn header_footer(&self) -> Option<&HeaderFooter>;

    /// Merged cell ranges, in file order.
    fn merge_cells(&self) -> &[CellRange];

    /// Declared column width ranges, in file order.
    fn column_widths(&self) -> &[ColumnWidth];

    /// Number of columns a row is projected onto.
    fn field_count(&self) -> usize;

    fn row_count(&self) -> usize;

    /// Start a fresh pass over the rows.
    ///
    /// Each call decodes the sheet data again; callers that need several
    /// passes over worksheets should go through the cursor's cache rather than
    /// reconstructing worksheets.
    fn read_rows(&self) -> Self::Rows;
}

/// Represents a workbook (collection of worksheets).
pub trait Workbook {
    type Worksheet: Worksheet;

    /// Lazy worksheet sequence produced by [`Workbook::read_worksheets`].
    type Worksheets: Iterator<Item = Result<Self::Worksheet>>;

    /// Start producing worksheets in directory order.
    ///
    /// Every worksheet yielded is constructed anew.
    fn read_worksheets(&self) -> Self::Worksheets;

    /// Look up a number format by its format index.
    fn number_format(&self, index: u32) -> Option<&NumberFormatString>;

    /// Zero-based index of the sheet shown when the workbook is opened.
    fn active_sheet(&self) -> usize;

    /// Number of sheets declared in the workbook directory.
    fn results_count(&self) -> usize;
}

//! Forward-only, multi-pass tabular cursor over a [`Workbook`].
//!
//! [`SheetReader`] walks worksheets with [`SheetReader::next_result`] and rows
//! with [`SheetReader::read`]. Each row is projected onto a slot array of
//! `field_count` cells indexed by column, so cell accessors are O(1) and a
//! column the row does not mention reads as empty. Worksheets are kept in a
//! [`WorksheetCache`], so [`SheetReader::reset`] replays them without
//! constructing them again.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use xlsb_cursor::ooxml::xlsb::{XlsbPackage, XlsbWorkbook};
//! use xlsb_cursor::sheet::{ReaderOptions, SheetReader};
//!
//! # fn main() -> xlsb_cursor::Result<()> {
//! // An empty workbook stream: no sheets declared
//! let package = XlsbPackage::new().with_part("xl/workbook.bin", Vec::new());
//! let workbook = XlsbWorkbook::open(package, &HashMap::new(), ReaderOptions::default())?;
//!
//! let mut reader = SheetReader::open(workbook)?;
//! assert_eq!(reader.results_count(), 0);
//! assert!(!reader.read()?);
//! reader.close();
//! # Ok(())
//! # }
//! ```

use super::cache::WorksheetCache;
use super::traits::{Workbook, Worksheet};
use super::types::{
    Cell, CellError, CellRange, CellStyle, CellValue, ColumnWidth, HeaderFooter,
    NumberFormatString, SheetVisibility,
};
use crate::common::{Error, Result};
use chrono::NaiveDateTime;

/// Width reported for a column no width range covers, in character units
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Where the cursor is in its walk over the workbook.
enum CursorState<R> {
    /// No pass started
    Unopened,
    /// On the worksheet at `index` in the cache; `rows` is `None` once the
    /// worksheet's rows are exhausted
    OnWorksheet { index: usize, rows: Option<R> },
    /// Past the last worksheet, or closed
    Exhausted,
}

type RowsOf<W> = <<W as Workbook>::Worksheet as Worksheet>::Rows;

/// Streaming cursor over a workbook's worksheets and rows.
pub struct SheetReader<W: Workbook> {
    workbook: Option<W>,
    cache: WorksheetCache<W>,
    state: CursorState<RowsOf<W>>,
    /// Current row projected by column; `None` until the first row of a
    /// worksheet is read
    row_cells: Option<Vec<Option<Cell>>>,
    row_height: f64,
    depth: i32,
    closed: bool,
}

impl<W: Workbook> SheetReader<W> {
    /// Attach a workbook and position on its first worksheet.
    pub fn open(workbook: W) -> Result<Self> {
        let mut reader = SheetReader {
            workbook: Some(workbook),
            cache: WorksheetCache::new(),
            state: CursorState::Unopened,
            row_cells: None,
            row_height: 0.0,
            depth: -1,
            closed: false,
        };
        reader.reset()?;
        Ok(reader)
    }

    /// Restart at the first worksheet.
    ///
    /// Worksheets reached by earlier passes come from the cache. A workbook
    /// without worksheets leaves the cursor exhausted.
    pub fn reset(&mut self) -> Result<()> {
        self.state = CursorState::Unopened;
        self.reset_sheet_data();
        self.enter_worksheet(0)
    }

    /// Advance to the next worksheet.
    ///
    /// Returns `false`, leaving the cursor exhausted, when there is none.
    pub fn next_result(&mut self) -> Result<bool> {
        let CursorState::OnWorksheet { index, .. } = self.state else {
            return Ok(false);
        };
        self.reset_sheet_data();
        self.enter_worksheet(index + 1)?;
        Ok(matches!(self.state, CursorState::OnWorksheet { .. }))
    }

    /// Advance to the next row of the current worksheet.
    ///
    /// Returns `false` when the worksheet has no more rows; the last row read
    /// stays readable until the worksheet changes.
    pub fn read(&mut self) -> Result<bool> {
        let CursorState::OnWorksheet { index, rows } = &mut self.state else {
            return Ok(false);
        };
        let Some(iter) = rows.as_mut() else {
            return Ok(false);
        };
        let row = match iter.next() {
            Some(Ok(row)) => row,
            Some(Err(e)) => {
                *rows = None;
                return Err(e);
            },
            None => {
                *rows = None;
                return Ok(false);
            },
        };

        let field_count = self.cache.cached(*index).map_or(0, |ws| ws.field_count());
        let slots = self.row_cells.get_or_insert_with(|| vec![None; field_count]);
        slots.iter_mut().for_each(|slot| *slot = None);
        for cell in row.cells {
            if let Some(slot) = slots.get_mut(cell.column_index) {
                *slot = Some(cell);
            }
        }
        self.row_height = row.height;
        self.depth += 1;
        Ok(true)
    }

    /// Release the worksheets, the cache and the workbook.
    ///
    /// Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.state = CursorState::Exhausted;
        self.reset_sheet_data();
        self.cache.clear();
        self.workbook = None;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn reset_sheet_data(&mut self) {
        self.depth = -1;
        self.row_cells = None;
        self.row_height = 0.0;
    }

    /// Make the worksheet at `index` current and prime its rows.
    fn enter_worksheet(&mut self, index: usize) -> Result<()> {
        let Some(workbook) = self.workbook.as_ref() else {
            self.state = CursorState::Exhausted;
            return Ok(());
        };
        match self.cache.get(workbook, index) {
            Ok(Some(worksheet)) => {
                self.state = CursorState::OnWorksheet {
                    index,
                    rows: Some(worksheet.read_rows()),
                };
                Ok(())
            },
            Ok(None) => {
                self.state = CursorState::Exhausted;
                Ok(())
            },
            Err(e) => {
                self.state = CursorState::Exhausted;
                Err(e)
            },
        }
    }

    fn current_index(&self) -> Option<usize> {
        match self.state {
            CursorState::OnWorksheet { index, .. } => Some(index),
            _ => None,
        }
    }

    fn current_worksheet(&self) -> Option<&W::Worksheet> {
        self.current_index().and_then(|index| self.cache.cached(index))
    }

    // Worksheet metadata

    pub fn name(&self) -> Option<&str> {
        self.current_worksheet().map(|ws| ws.name())
    }

    pub fn code_name(&self) -> Option<&str> {
        self.current_worksheet().and_then(|ws| ws.code_name())
    }

    pub fn visible_state(&self) -> Option<SheetVisibility> {
        self.current_worksheet().map(|ws| ws.visible_state())
    }

    pub fn header_footer(&self) -> Option<&HeaderFooter> {
        self.current_worksheet().and_then(|ws| ws.header_footer())
    }

    pub fn merge_cells(&self) -> &[CellRange] {
        self.current_worksheet()
            .map(|ws| ws.merge_cells())
            .unwrap_or_default()
    }

    pub fn column_widths(&self) -> &[ColumnWidth] {
        self.current_worksheet()
            .map(|ws| ws.column_widths())
            .unwrap_or_default()
    }

    pub fn field_count(&self) -> usize {
        self.current_worksheet().map_or(0, |ws| ws.field_count())
    }

    pub fn row_count(&self) -> usize {
        self.current_worksheet().map_or(0, |ws| ws.row_count())
    }

    /// Height of the current row in points.
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Rows read in the current worksheet minus one: -1 before the first read.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Width of column `i` in character units.
    ///
    /// Hidden columns report 0; columns no range covers report
    /// [`DEFAULT_COLUMN_WIDTH`].
    pub fn get_column_width(&self, i: usize) -> Result<f64> {
        if i >= self.field_count() {
            return Err(Error::InvalidArgument(format!(
                "column {} is out of range for {} fields",
                i,
                self.field_count()
            )));
        }
        let width = self
            .column_widths()
            .iter()
            .find(|range| (range.minimum as usize..=range.maximum as usize).contains(&i))
            .map_or(DEFAULT_COLUMN_WIDTH, |range| {
                if range.hidden { 0.0 } else { range.width }
            });
        Ok(width)
    }

    // Workbook metadata

    /// Index of the workbook's active sheet.
    pub fn active_sheet(&self) -> Option<usize> {
        self.workbook.as_ref().map(|wb| wb.active_sheet())
    }

    pub fn is_active_sheet(&self) -> bool {
        match (self.current_worksheet(), self.active_sheet()) {
            (Some(ws), Some(active)) => ws.sheet_index() == active,
            _ => false,
        }
    }

    /// Number of worksheets, or -1 once no workbook is attached.
    pub fn results_count(&self) -> i32 {
        self.workbook
            .as_ref()
            .map_or(-1, |wb| i32::try_from(wb.results_count()).unwrap_or(i32::MAX))
    }

    // Cell accessors

    fn row_cells(&self) -> Result<&[Option<Cell>]> {
        if self.closed {
            return Err(Error::Closed);
        }
        self.row_cells
            .as_deref()
            .ok_or_else(|| Error::InvalidState("no row has been read".to_string()))
    }

    fn cell(&self, i: usize) -> Result<Option<&Cell>> {
        Ok(self.row_cells()?.get(i).and_then(Option::as_ref))
    }

    /// Value of column `i`; columns without a cell read as empty.
    pub fn get_value(&self, i: usize) -> Result<&CellValue> {
        Ok(self.cell(i)?.map_or(CellValue::EMPTY, |cell| &cell.value))
    }

    /// Copy the current row into `values`, returning the number copied.
    pub fn get_values(&self, values: &mut [CellValue]) -> Result<usize> {
        let cells = self.row_cells()?;
        let count = values.len().min(cells.len());
        for (value, cell) in values.iter_mut().zip(cells) {
            *value = cell.as_ref().map(|c| c.value.clone()).unwrap_or_default();
        }
        Ok(count)
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        Ok(self.get_value(i)?.is_empty())
    }

    pub fn get_bool(&self, i: usize) -> Result<bool> {
        match self.get_value(i)? {
            CellValue::Bool(b) => Ok(*b),
            _ => Err(Error::InvalidCast {
                column: i,
                expected: "bool",
            }),
        }
    }

    pub fn get_double(&self, i: usize) -> Result<f64> {
        match self.get_value(i)? {
            CellValue::Number(n) => Ok(*n),
            _ => Err(Error::InvalidCast {
                column: i,
                expected: "number",
            }),
        }
    }

    pub fn get_string(&self, i: usize) -> Result<&str> {
        match self.get_value(i)? {
            CellValue::String(s) => Ok(s),
            _ => Err(Error::InvalidCast {
                column: i,
                expected: "string",
            }),
        }
    }

    pub fn get_date_time(&self, i: usize) -> Result<NaiveDateTime> {
        match self.get_value(i)? {
            CellValue::DateTime(dt) => Ok(*dt),
            _ => Err(Error::InvalidCast {
                column: i,
                expected: "datetime",
            }),
        }
    }

    /// Name of the value type stored in column `i`.
    pub fn get_data_type_name(&self, i: usize) -> Result<&'static str> {
        Ok(self.get_value(i)?.type_name())
    }

    pub fn get_cell_error(&self, i: usize) -> Result<Option<CellError>> {
        Ok(self.cell(i)?.and_then(|cell| cell.error))
    }

    /// Effective style of column `i`, or the default style.
    pub fn get_cell_style(&self, i: usize) -> Result<CellStyle> {
        Ok(self
            .cell(i)?
            .and_then(|cell| cell.style)
            .unwrap_or_default())
    }

    /// Number format index of column `i`, -1 when the cell has no style.
    pub fn get_number_format_index(&self, i: usize) -> Result<i64> {
        Ok(self
            .cell(i)?
            .and_then(|cell| cell.style)
            .map_or(-1, |style| i64::from(style.number_format_index)))
    }

    /// Number format of column `i`, resolved through the workbook.
    pub fn get_number_format_string(&self, i: usize) -> Result<Option<&NumberFormatString>> {
        let Some(style) = self.cell(i)?.and_then(|cell| cell.style) else {
            return Ok(None);
        };
        Ok(self
            .workbook
            .as_ref()
            .and_then(|wb| wb.number_format(style.number_format_index)))
    }

    // Operations with no meaning for a forward-only cursor

    pub fn get_name(&self, _i: usize) -> Result<&str> {
        Err(Error::Unsupported("column names".to_string()))
    }

    pub fn get_ordinal(&self, _name: &str) -> Result<usize> {
        Err(Error::Unsupported("lookup by column name".to_string()))
    }

    pub fn records_affected(&self) -> Result<usize> {
        Err(Error::Unsupported("affected record count".to_string()))
    }

    pub fn get_schema_table(&self) -> Result<()> {
        Err(Error::Unsupported("schema table".to_string()))
    }
}

impl<W: Workbook> Drop for SheetReader<W> {
    fn drop(&mut self) {
        self.close();
    }
}

//! Worksheet implementation for XLSB files
//!
//! A worksheet part is decoded twice: once when the worksheet is constructed,
//! to collect its dimensions, column widths, merged ranges and page header
//! text, and once per [`Worksheet::read_rows`] pass, which streams rows
//! lazily from the same bytes.

use crate::common::Result;
use crate::ooxml::xlsb::error::XlsbResult;
use crate::ooxml::xlsb::reader::{BiffReader, RecordDecoder};
use crate::ooxml::xlsb::records::{
    CellRecord, DimensionRecord, HeaderFooterFlags, Record, RowHeaderRecord, Section,
    SheetRecord, WsFmtInfoRecord, WsPropRecord, get_dword, get_nullable_string,
    get_wide_string, get_word, record_types,
};
use crate::ooxml::xlsb::workbook::WorkbookContext;
use crate::sheet::traits::Worksheet;
use crate::sheet::types::{
    CellRange, ColumnWidth, HeaderFooter, Row, SheetVisibility,
};
use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use log::debug;
use std::sync::Arc;

/// Columns in a BIFF12 sheet (A..XFD)
const MAX_COLUMNS: u32 = 16_384;

/// Rows in a BIFF12 sheet
const MAX_ROWS: u32 = 1_048_576;

/// Row height in points when the sheet declares no default
const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Offset of the code name in BrtWsProp (after flags, tab color and anchors)
const WS_PROP_CODE_NAME_OFFSET: usize = 19;

/// Decoder for worksheet parts
#[derive(Debug, Default)]
pub struct WorksheetDecoder;

impl RecordDecoder for WorksheetDecoder {
    fn decode(&mut self, buffer: &[u8], record_type: u32, _record_len: u32) -> XlsbResult<Record> {
        use record_types::*;

        if let Some(cell) = CellRecord::parse(record_type, buffer)? {
            return Ok(Record::Cell(cell));
        }

        let record = match record_type {
            ROW_HDR => Record::RowHeader(RowHeaderRecord {
                row: get_dword(buffer, 0)?,
                height: f64::from(get_word(buffer, 8)?) / 20.0,
            }),
            BEGIN_SHEET_DATA => Record::BeginSection(Section::SheetData),
            END_SHEET_DATA => Record::EndSection(Section::SheetData),
            WS_PROP => {
                let code_name = if buffer.len() > WS_PROP_CODE_NAME_OFFSET + 4 {
                    let mut offset = WS_PROP_CODE_NAME_OFFSET;
                    Some(get_wide_string(buffer, &mut offset)?).filter(|s| !s.is_empty())
                } else {
                    None
                };
                Record::WorksheetProperties(WsPropRecord { code_name })
            },
            WS_DIM => Record::Dimension(DimensionRecord {
                row_first: get_dword(buffer, 0)?,
                row_last: get_dword(buffer, 4)?,
                col_first: get_dword(buffer, 8)?,
                col_last: get_dword(buffer, 12)?,
            }),
            WS_FMT_INFO => Record::FormatInfo(WsFmtInfoRecord {
                default_row_height: f64::from(get_word(buffer, 6)?) / 20.0,
            }),
            COL_INFO => {
                let flags = get_word(buffer, 16)?;
                Record::ColumnInfo(ColumnWidth {
                    minimum: get_dword(buffer, 0)?,
                    maximum: get_dword(buffer, 4)?,
                    width: f64::from(get_dword(buffer, 8)?) / 256.0,
                    hidden: flags & 0x0001 != 0,
                    custom_width: flags & 0x0002 != 0,
                })
            },
            MERGE_CELL => Record::MergeCell(CellRange::new(
                get_dword(buffer, 0)?,
                get_dword(buffer, 8)?,
                get_dword(buffer, 4)?,
                get_dword(buffer, 12)?,
            )),
            BEGIN_HEADER_FOOTER => Record::HeaderFooter(parse_header_footer(buffer)?),
            _ => Record::Ignored,
        };
        Ok(record)
    }
}

/// BrtBeginHeaderFooter: flag word, then six nullable strings
fn parse_header_footer(buffer: &[u8]) -> XlsbResult<HeaderFooter> {
    let flags = HeaderFooterFlags::from_bits_retain(get_word(buffer, 0)?);
    let mut offset = 2;
    let mut next = || get_nullable_string(buffer, &mut offset);
    Ok(HeaderFooter {
        has_different_odd_even: flags.contains(HeaderFooterFlags::DIFFERENT_ODD_EVEN),
        has_different_first: flags.contains(HeaderFooterFlags::DIFFERENT_FIRST),
        scale_with_doc: flags.contains(HeaderFooterFlags::SCALE_WITH_DOC),
        align_with_margins: flags.contains(HeaderFooterFlags::ALIGN_WITH_MARGINS),
        odd_header: next()?,
        odd_footer: next()?,
        even_header: next()?,
        even_footer: next()?,
        first_header: next()?,
        first_footer: next()?,
    })
}

/// XLSB worksheet implementation
#[derive(Debug, Clone)]
pub struct XlsbWorksheet {
    sheet_index: usize,
    name: String,
    code_name: Option<String>,
    visibility: SheetVisibility,
    header_footer: Option<HeaderFooter>,
    merge_cells: Vec<CellRange>,
    column_widths: Vec<ColumnWidth>,
    field_count: usize,
    row_count: usize,
    default_row_height: f64,
    data: Bytes,
    context: Arc<WorkbookContext>,
}

impl XlsbWorksheet {
    /// Build a worksheet from its directory entry and part bytes.
    ///
    /// `sheet_index` is the entry's position in the workbook directory.
    ///
    /// Decodes the whole part once for worksheet-level metadata; cell values
    /// are discarded here and decoded again by each row pass.
    pub(crate) fn new(
        sheet_index: usize,
        sheet: SheetRecord,
        data: Bytes,
        context: Arc<WorkbookContext>,
    ) -> Result<Self> {
        let mut worksheet = XlsbWorksheet {
            sheet_index,
            name: sheet.name,
            code_name: None,
            visibility: sheet.visibility,
            header_footer: None,
            merge_cells: Vec::new(),
            column_widths: Vec::new(),
            field_count: 0,
            row_count: 0,
            default_row_height: DEFAULT_ROW_HEIGHT,
            data,
            context,
        };

        let mut dimension = None;
        let mut max_row = None;
        let mut max_col = None;

        for record in BiffReader::new(worksheet.data.clone().reader(), WorksheetDecoder) {
            match record? {
                Record::WorksheetProperties(prop) => worksheet.code_name = prop.code_name,
                Record::Dimension(dim) => dimension = Some(dim),
                Record::FormatInfo(info) if info.default_row_height > 0.0 => {
                    worksheet.default_row_height = info.default_row_height;
                },
                Record::ColumnInfo(width) => worksheet.column_widths.push(width),
                Record::MergeCell(range) => worksheet.merge_cells.push(range),
                Record::HeaderFooter(hf) => worksheet.header_footer = Some(hf),
                Record::RowHeader(header) => max_row = max_row.max(Some(header.row)),
                Record::Cell(cell) => max_col = max_col.max(Some(cell.column)),
                _ => {},
            }
        }

        let (rows, cols) = match dimension {
            Some(dim) => (dim.row_last.saturating_add(1), dim.col_last.saturating_add(1)),
            None => (
                max_row.map_or(0, |r: u32| r.saturating_add(1)),
                max_col.map_or(0, |c: u32| c.saturating_add(1)),
            ),
        };
        worksheet.row_count = rows.min(MAX_ROWS) as usize;
        worksheet.field_count = cols.min(MAX_COLUMNS) as usize;

        debug!(
            "materialized worksheet '{}': {} rows x {} fields, {} merged ranges",
            worksheet.name,
            worksheet.row_count,
            worksheet.field_count,
            worksheet.merge_cells.len()
        );
        Ok(worksheet)
    }

    /// Default row height in points
    pub fn default_row_height(&self) -> f64 {
        self.default_row_height
    }
}

impl Worksheet for XlsbWorksheet {
    type Rows = XlsbRows;

    fn sheet_index(&self) -> usize {
        self.sheet_index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn code_name(&self) -> Option<&str> {
        self.code_name.as_deref()
    }

    fn visible_state(&self) -> SheetVisibility {
        self.visibility
    }

    fn header_footer(&self) -> Option<&HeaderFooter> {
        self.header_footer.as_ref()
    }

    fn merge_cells(&self) -> &[CellRange] {
        &self.merge_cells
    }

    fn column_widths(&self) -> &[ColumnWidth] {
        &self.column_widths
    }

    fn field_count(&self) -> usize {
        self.field_count
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn read_rows(&self) -> XlsbRows {
        XlsbRows {
            reader: BiffReader::new(self.data.clone().reader(), WorksheetDecoder),
            context: Arc::clone(&self.context),
            current: None,
            ready: None,
            next_index: 0,
            default_row_height: self.default_row_height,
            done: false,
        }
    }
}

/// Lazy row sequence of one worksheet pass.
///
/// Cells are attached to the most recent row header. With
/// `fill_missing_rows`, row indices the part skips are yielded as empty rows
/// of the default height.
pub struct XlsbRows {
    reader: BiffReader<Reader<Bytes>, WorksheetDecoder>,
    context: Arc<WorkbookContext>,
    /// Row still collecting cells
    current: Option<Row>,
    /// Completed row waiting to be yielded
    ready: Option<Row>,
    next_index: u32,
    default_row_height: f64,
    done: bool,
}

impl XlsbRows {
    /// Yield `row`, or a gap row before it when indices were skipped.
    ///
    /// Rows past the last addressable sheet row are yielded as found, with
    /// no gap rows in front of them.
    fn emit(&mut self, row: Row) -> Row {
        if self.context.options.fill_missing_rows
            && row.index > self.next_index
            && row.index < MAX_ROWS
        {
            let gap = Row::new(self.next_index, self.default_row_height);
            self.next_index += 1;
            self.ready = Some(row);
            return gap;
        }
        self.next_index = self.next_index.max(row.index.saturating_add(1));
        row
    }
}

impl Iterator for XlsbRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.ready.take() {
                return Some(Ok(self.emit(row)));
            }
            if self.done {
                return None;
            }
            match self.reader.read_record() {
                Err(e) => {
                    self.done = true;
                    self.current = None;
                    return Some(Err(e.into()));
                },
                Ok(None) | Ok(Some(Record::EndSection(Section::SheetData))) => {
                    self.done = true;
                    self.ready = self.current.take();
                },
                Ok(Some(Record::RowHeader(header))) => {
                    self.ready = self.current.replace(Row::new(header.row, header.height));
                },
                Ok(Some(Record::Cell(cell))) => {
                    if let Some(row) = self.current.as_mut() {
                        row.cells.push(self.context.resolve_cell(cell));
                    }
                },
                Ok(Some(_)) => {},
            }
        }
    }
}

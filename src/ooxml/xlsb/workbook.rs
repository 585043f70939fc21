//! Workbook implementation for XLSB files

use crate::common::{Error, Result};
use crate::ooxml::xlsb::error::XlsbResult;
use crate::ooxml::xlsb::package::PartProvider;
use crate::ooxml::xlsb::reader::{BiffReader, RecordDecoder};
use crate::ooxml::xlsb::records::{
    BookViewRecord, CellRecord, RawCellValue, Record, SheetRecord, WorkbookPropRecord, get_byte,
    get_dword, get_nullable_string, get_wide_string, record_types,
};
use crate::ooxml::xlsb::shared_strings::SharedStringTable;
use crate::ooxml::xlsb::styles_table::StylesTable;
use crate::ooxml::xlsb::worksheet::XlsbWorksheet;
use crate::sheet::ReaderOptions;
use crate::sheet::date::serial_to_datetime;
use crate::sheet::traits::Workbook;
use crate::sheet::types::{Cell, CellError, CellValue, NumberFormatString, SheetVisibility};
use bytes::Buf;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Decoder for the workbook part.
///
/// Sheet relationship ids are resolved against `relationships` while
/// decoding; an id with no entry leaves the sheet's path empty.
#[derive(Debug)]
pub struct WorkbookDecoder<'a> {
    relationships: &'a HashMap<String, String>,
}

impl<'a> WorkbookDecoder<'a> {
    pub fn new(relationships: &'a HashMap<String, String>) -> Self {
        WorkbookDecoder { relationships }
    }
}

impl RecordDecoder for WorkbookDecoder<'_> {
    fn decode(&mut self, buffer: &[u8], record_type: u32, _record_len: u32) -> XlsbResult<Record> {
        let record = match record_type {
            record_types::WORKBOOK_PROP => Record::WorkbookProperties(WorkbookPropRecord {
                is_date1904: get_byte(buffer, 0)? & 0x01 != 0,
            }),
            record_types::BUNDLE_SH => {
                let visibility = SheetVisibility::from_code(get_dword(buffer, 0)?);
                let id = get_dword(buffer, 4)?;
                let mut offset = 8;
                let rel_id = get_nullable_string(buffer, &mut offset)?;
                let name = get_wide_string(buffer, &mut offset)?;
                let path = rel_id
                    .as_ref()
                    .and_then(|rel| self.relationships.get(rel))
                    .cloned();
                Record::Sheet(SheetRecord {
                    name,
                    id,
                    rel_id,
                    visibility,
                    path,
                })
            },
            record_types::BOOK_VIEW => Record::ActiveSheet(BookViewRecord {
                active_sheet: get_dword(buffer, 24)?,
            }),
            _ => Record::Ignored,
        };
        Ok(record)
    }
}

/// Workbook-wide state every worksheet needs to turn cell records into cells.
#[derive(Debug, Default)]
pub struct WorkbookContext {
    pub(crate) styles: StylesTable,
    pub(crate) shared_strings: SharedStringTable,
    pub(crate) is_1904: bool,
    pub(crate) options: ReaderOptions,
}

impl WorkbookContext {
    pub(crate) fn with_options(options: ReaderOptions) -> Self {
        WorkbookContext {
            options,
            ..Default::default()
        }
    }

    /// Resolve shared strings, error codes, styles and dates for one cell.
    pub(crate) fn resolve_cell(&self, record: CellRecord) -> Cell {
        let mut error = None;
        let value = match record.value {
            RawCellValue::Blank => CellValue::Empty,
            RawCellValue::Bool(b) => CellValue::Bool(b),
            RawCellValue::Error(code) => {
                error = CellError::from_code(code);
                CellValue::Empty
            },
            RawCellValue::Number(n) => self.number_value(n, record.style_index),
            RawCellValue::String(s) => CellValue::String(s),
            RawCellValue::SharedString(index) => self
                .shared_strings
                .get(index)
                .map_or(CellValue::Empty, |s| CellValue::String(s.to_string())),
        };

        Cell {
            column_index: record.column as usize,
            value,
            error,
            style: self.styles.cell_style(record.style_index),
        }
    }

    fn number_value(&self, n: f64, style_index: u32) -> CellValue {
        if self.options.convert_dates && self.styles.is_date_style(style_index) {
            if let Some(dt) = serial_to_datetime(n, self.is_1904) {
                return CellValue::DateTime(dt);
            }
        }
        CellValue::Number(n)
    }
}

/// XLSB workbook implementation
pub struct XlsbWorkbook<P> {
    package: Arc<P>,
    sheets: Vec<SheetRecord>,
    active_sheet: usize,
    context: Arc<WorkbookContext>,
}

impl<P> std::fmt::Debug for XlsbWorkbook<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsbWorkbook")
            .field("sheets", &self.sheets)
            .field("active_sheet", &self.active_sheet)
            .field("is_1904", &self.context.is_1904)
            .field("shared_strings_count", &self.context.shared_strings.len())
            .finish()
    }
}

impl<P: PartProvider> XlsbWorkbook<P> {
    /// Decode the workbook, styles and shared string parts of `package`.
    ///
    /// `relationships` maps the workbook's relationship ids to part paths
    /// inside `package`. Worksheet parts are not touched until worksheets are
    /// read.
    pub fn open(
        package: P,
        relationships: &HashMap<String, String>,
        options: ReaderOptions,
    ) -> Result<Self> {
        let workbook_part = package
            .part(&options.workbook_part)
            .ok_or_else(|| Error::MissingPart(options.workbook_part.clone()))?;

        let mut sheets = Vec::new();
        let mut active_sheet = 0;
        let mut is_1904 = false;
        let decoder = WorkbookDecoder::new(relationships);
        for record in BiffReader::new(workbook_part.reader(), decoder) {
            match record? {
                Record::WorkbookProperties(prop) => is_1904 = prop.is_date1904,
                Record::Sheet(sheet) => sheets.push(sheet),
                Record::ActiveSheet(view) => active_sheet = view.active_sheet as usize,
                _ => {},
            }
        }

        let styles = match package.part(&options.styles_part) {
            Some(data) => StylesTable::from_reader(data.reader())?,
            None => StylesTable::default(),
        };
        let shared_strings = match package.part(&options.shared_strings_part) {
            Some(data) => SharedStringTable::from_reader(data.reader())?,
            None => SharedStringTable::default(),
        };

        debug!(
            "opened workbook: {} sheets, {} shared strings, 1904 dates: {}, active sheet {}",
            sheets.len(),
            shared_strings.len(),
            is_1904,
            active_sheet
        );

        Ok(XlsbWorkbook {
            package: Arc::new(package),
            sheets,
            active_sheet,
            context: Arc::new(WorkbookContext {
                styles,
                shared_strings,
                is_1904,
                options,
            }),
        })
    }

    /// Sheet directory entries in workbook order
    pub fn sheets(&self) -> &[SheetRecord] {
        &self.sheets
    }

    pub fn is_1904(&self) -> bool {
        self.context.is_1904
    }
}

impl<P: PartProvider> Workbook for XlsbWorkbook<P> {
    type Worksheet = XlsbWorksheet;
    type Worksheets = XlsbWorksheets<P>;

    fn read_worksheets(&self) -> XlsbWorksheets<P> {
        XlsbWorksheets {
            package: Arc::clone(&self.package),
            context: Arc::clone(&self.context),
            sheets: self.sheets.clone().into_iter().enumerate(),
        }
    }

    fn number_format(&self, index: u32) -> Option<&NumberFormatString> {
        self.context.styles.number_format(index)
    }

    fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    fn results_count(&self) -> usize {
        self.sheets.len()
    }
}

/// Worksheets of an [`XlsbWorkbook`], constructed one at a time.
pub struct XlsbWorksheets<P> {
    package: Arc<P>,
    context: Arc<WorkbookContext>,
    /// Directory entries paired with their position in the workbook
    sheets: std::iter::Enumerate<std::vec::IntoIter<SheetRecord>>,
}

impl<P: PartProvider> Iterator for XlsbWorksheets<P> {
    type Item = Result<XlsbWorksheet>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, sheet) in self.sheets.by_ref() {
            let data = sheet.path.as_deref().and_then(|path| self.package.part(path));
            let Some(data) = data else {
                let target = sheet
                    .path
                    .clone()
                    .or_else(|| sheet.rel_id.clone())
                    .unwrap_or_default();
                if self.context.options.skip_unresolved_sheets {
                    warn!("skipping sheet '{}': no part for '{}'", sheet.name, target);
                    continue;
                }
                return Some(Err(Error::MissingPart(format!(
                    "sheet '{}' ({})",
                    sheet.name, target
                ))));
            };
            return Some(XlsbWorksheet::new(index, sheet, data, Arc::clone(&self.context)));
        }
        None
    }
}

//! XLSB record model and payload field helpers
//!
//! A BIFF12 stream is a flat sequence of records: a variable-length type,
//! a variable-length size, and exactly that many payload bytes. Decoders turn
//! each payload into one [`Record`]; tags a decoder has no use for become
//! [`Record::Ignored`].
//!
//! All payload offsets used below are relative to the start of the payload.

use crate::common::binary;
use crate::ooxml::xlsb::error::XlsbResult;
use crate::sheet::types::{CellRange, ColumnWidth, HeaderFooter, SheetVisibility};

/// XLSB record types (matching MS-XLSB specification)
/// Reference: [MS-XLSB] https://docs.microsoft.com/en-us/openspecs/office_file_formats/ms-xlsb/
pub mod record_types {
    // Cell records
    pub const ROW_HDR: u32 = 0x0000;
    pub const CELL_BLANK: u32 = 0x0001;
    pub const CELL_RK: u32 = 0x0002;
    pub const CELL_ERROR: u32 = 0x0003;
    pub const CELL_BOOL: u32 = 0x0004;
    pub const CELL_REAL: u32 = 0x0005;
    pub const CELL_ST: u32 = 0x0006;
    pub const CELL_ISST: u32 = 0x0007;
    pub const FMLA_STRING: u32 = 0x0008;
    pub const FMLA_NUM: u32 = 0x0009;
    pub const FMLA_BOOL: u32 = 0x000A;
    pub const FMLA_ERROR: u32 = 0x000B;
    pub const CELL_R_STRING: u32 = 0x003E;

    // Shared string table
    pub const SST_ITEM: u32 = 0x0013;
    pub const BEGIN_SST: u32 = 0x009F;
    pub const END_SST: u32 = 0x00A0;

    // Style sheet records
    pub const FMT: u32 = 0x002C;
    pub const XF: u32 = 0x002F;
    pub const BEGIN_FMTS: u32 = 0x0267;
    pub const END_FMTS: u32 = 0x0268;
    pub const BEGIN_CELL_XFS: u32 = 0x0269;
    pub const END_CELL_XFS: u32 = 0x026A;
    pub const BEGIN_CELL_STYLE_XFS: u32 = 0x0272;
    pub const END_CELL_STYLE_XFS: u32 = 0x0273;

    // Worksheet structure
    pub const COL_INFO: u32 = 0x003C;
    pub const BEGIN_SHEET: u32 = 0x0081;
    pub const END_SHEET: u32 = 0x0082;
    pub const BEGIN_SHEET_DATA: u32 = 0x0091;
    pub const END_SHEET_DATA: u32 = 0x0092;
    pub const WS_PROP: u32 = 0x0093;
    pub const WS_DIM: u32 = 0x0094;
    pub const MERGE_CELL: u32 = 0x00B0;
    pub const BEGIN_HEADER_FOOTER: u32 = 0x01DF;
    pub const WS_FMT_INFO: u32 = 0x01E5;

    // Workbook structure
    pub const WORKBOOK_PROP: u32 = 0x0099;
    pub const BUNDLE_SH: u32 = 0x009C;
    pub const BOOK_VIEW: u32 = 0x009E;
}

/// Marks delimiting the record groups decoders care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    SheetData,
    SharedStrings,
    Formats,
    CellXfs,
    CellStyleXfs,
}

/// One decoded record.
///
/// Records are consumed once by whatever assembles workbook, worksheet or
/// style state and are not retained afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A tag the active decoder does not need
    Ignored,
    BeginSection(Section),
    EndSection(Section),

    // Workbook scope
    WorkbookProperties(WorkbookPropRecord),
    Sheet(SheetRecord),
    ActiveSheet(BookViewRecord),

    // Worksheet scope
    WorksheetProperties(WsPropRecord),
    Dimension(DimensionRecord),
    FormatInfo(WsFmtInfoRecord),
    ColumnInfo(ColumnWidth),
    MergeCell(CellRange),
    HeaderFooter(HeaderFooter),
    RowHeader(RowHeaderRecord),
    Cell(CellRecord),

    // Styles and strings
    NumberFormat(FormatRecord),
    ExtendedFormat(XfRecord),
    SharedString(String),
}

/// BrtWbProp: workbook-wide flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbookPropRecord {
    /// Dates are counted from 1904-01-01 instead of 1900
    pub is_date1904: bool,
}

/// BrtBundleSh: one sheet directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub name: String,
    /// Sheet id from the directory entry; sheets are addressed by position
    pub id: u32,
    pub rel_id: Option<String>,
    pub visibility: SheetVisibility,
    /// Storage path resolved from `rel_id`, `None` when absent or unresolvable
    pub path: Option<String>,
}

/// BrtBookView: default active sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookViewRecord {
    pub active_sheet: u32,
}

/// BrtWsProp: worksheet properties, only the code name is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsPropRecord {
    pub code_name: Option<String>,
}

/// BrtWsDim: used range of the sheet (inclusive, zero-based)
///
/// Only the last row and column size a worksheet; the first ones are kept as
/// decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionRecord {
    pub row_first: u32,
    pub row_last: u32,
    pub col_first: u32,
    pub col_last: u32,
}

/// BrtWsFmtInfo: sheet-level defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WsFmtInfoRecord {
    /// Default row height in points
    pub default_row_height: f64,
}

/// BrtRowHdr
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeaderRecord {
    pub row: u32,
    /// Height in points
    pub height: f64,
}

/// Cell value as stored, before shared strings and styles are applied
#[derive(Debug, Clone, PartialEq)]
pub enum RawCellValue {
    Blank,
    Bool(bool),
    Error(u8),
    Number(f64),
    String(String),
    /// Index into the shared string table
    SharedString(u32),
}

/// Any of the cell and formula-cell records
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub column: u32,
    /// Index into the cell XF table
    pub style_index: u32,
    pub value: RawCellValue,
}

/// BrtFmt: custom number format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRecord {
    pub id: u16,
    pub format_code: String,
}

/// BrtXF: extended format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XfRecord {
    pub num_fmt_id: u16,
    pub font_id: u16,
    pub indent: u8,
    pub flags: XfFlags,
}

bitflags::bitflags! {
    /// Flag word of BrtXF at payload offset 12
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct XfFlags: u16 {
        const HORIZONTAL_ALIGNMENT = 0x0007;
        const VERTICAL_ALIGNMENT = 0x0038;
        const WRAP = 0x0040;
        const SHRINK_TO_FIT = 0x0100;
        const LOCKED = 0x1000;
        const HIDDEN = 0x2000;
        const _ = !0;
    }
}

impl XfFlags {
    pub fn horizontal_alignment(&self) -> u8 {
        (self.bits() & Self::HORIZONTAL_ALIGNMENT.bits()) as u8
    }
}

bitflags::bitflags! {
    /// Flag word of BrtBeginHeaderFooter
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFooterFlags: u16 {
        const DIFFERENT_ODD_EVEN = 0x0001;
        const DIFFERENT_FIRST = 0x0002;
        const SCALE_WITH_DOC = 0x0004;
        const ALIGN_WITH_MARGINS = 0x0008;
        const _ = !0;
    }
}

/// XLNullableWideString length marking an absent string
const NULL_STRING_LEN: u32 = 0xFFFF_FFFF;

/// Read a 1-byte field.
#[inline]
pub fn get_byte(buf: &[u8], offset: usize) -> XlsbResult<u8> {
    Ok(binary::read_u8(buf, offset)?)
}

/// Read a 2-byte little-endian field.
#[inline]
pub fn get_word(buf: &[u8], offset: usize) -> XlsbResult<u16> {
    Ok(binary::read_u16_le(buf, offset)?)
}

/// Read a 4-byte little-endian field.
#[inline]
pub fn get_dword(buf: &[u8], offset: usize) -> XlsbResult<u32> {
    Ok(binary::read_u32_le(buf, offset)?)
}

/// Read an 8-byte IEEE double.
#[inline]
pub fn get_double(buf: &[u8], offset: usize) -> XlsbResult<f64> {
    Ok(binary::read_f64_le(buf, offset)?)
}

/// Read a UTF-16LE string of exactly `len` characters at `offset`.
pub fn get_string(buf: &[u8], offset: usize, len: u32) -> XlsbResult<String> {
    Ok(binary::read_utf16le(buf, offset, len as usize)?)
}

/// Read an XLWideString at `*offset` and advance past it.
pub fn get_wide_string(buf: &[u8], offset: &mut usize) -> XlsbResult<String> {
    let len = get_dword(buf, *offset)?;
    let s = get_string(buf, *offset + 4, len)?;
    *offset += 4 + len as usize * 2;
    Ok(s)
}

/// Read an XLNullableWideString at `*offset` and advance past it.
///
/// A length of `0xFFFFFFFF` means no string; only the length field is consumed.
pub fn get_nullable_string(buf: &[u8], offset: &mut usize) -> XlsbResult<Option<String>> {
    let len = get_dword(buf, *offset)?;
    if len == NULL_STRING_LEN {
        *offset += 4;
        return Ok(None);
    }
    get_wide_string(buf, offset).map(Some)
}

/// Decode an RkNumber.
///
/// Bit 0 selects the divide-by-100 form, bit 1 selects a 30-bit integer;
/// otherwise the upper 30 bits are the high bits of an IEEE double.
pub fn rk_to_f64(rk: u32) -> f64 {
    let d100 = (rk & 0x01) != 0;
    let is_int = (rk & 0x02) != 0;

    let value = if is_int {
        ((rk as i32) >> 2) as f64
    } else {
        let mut float_bits = [0u8; 8];
        float_bits[4..8].copy_from_slice(&(rk & 0xFFFF_FFFC).to_le_bytes());
        f64::from_le_bytes(float_bits)
    };

    if d100 { value / 100.0 } else { value }
}

impl CellRecord {
    /// Decode any cell or formula-cell record.
    ///
    /// Returns `Ok(None)` for tags that are not cell records.
    pub fn parse(record_type: u32, data: &[u8]) -> XlsbResult<Option<Self>> {
        use record_types::*;

        let value = match record_type {
            CELL_BLANK => RawCellValue::Blank,
            CELL_RK => RawCellValue::Number(rk_to_f64(get_dword(data, 8)?)),
            CELL_ERROR | FMLA_ERROR => RawCellValue::Error(get_byte(data, 8)?),
            CELL_BOOL | FMLA_BOOL => RawCellValue::Bool(get_byte(data, 8)? != 0),
            CELL_REAL | FMLA_NUM => RawCellValue::Number(get_double(data, 8)?),
            CELL_ST | FMLA_STRING => {
                let mut offset = 8;
                RawCellValue::String(get_wide_string(data, &mut offset)?)
            },
            CELL_R_STRING => {
                let mut offset = 9;
                RawCellValue::String(get_wide_string(data, &mut offset)?)
            },
            CELL_ISST => RawCellValue::SharedString(get_dword(data, 8)?),
            _ => return Ok(None),
        };

        Ok(Some(CellRecord {
            column: get_dword(data, 0)?,
            style_index: get_dword(data, 4)? & 0x00FF_FFFF,
            value,
        }))
    }
}

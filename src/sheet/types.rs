//! Common types for tabular extraction.

use chrono::NaiveDateTime;
use std::fmt;

/// Visibility state of a worksheet as declared by the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SheetVisibility {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetVisibility {
    /// Map a BrtBundleSh `hsState` code. Unknown codes read as visible.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => SheetVisibility::Hidden,
            2 => SheetVisibility::VeryHidden,
            _ => SheetVisibility::Visible,
        }
    }

    /// Lower-case name used by consumers ("visible", "hidden", "veryhidden").
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetVisibility::Visible => "visible",
            SheetVisibility::Hidden => "hidden",
            SheetVisibility::VeryHidden => "veryhidden",
        }
    }
}

impl fmt::Display for SheetVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Excel error value stored in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellError {
    Null = 0x00,
    Div0 = 0x07,
    Value = 0x0F,
    Ref = 0x17,
    Name = 0x1D,
    Num = 0x24,
    NA = 0x2A,
    GettingData = 0x2B,
}

impl CellError {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(CellError::Null),
            0x07 => Some(CellError::Div0),
            0x0F => Some(CellError::Value),
            0x17 => Some(CellError::Ref),
            0x1D => Some(CellError::Name),
            0x24 => Some(CellError::Num),
            0x2A => Some(CellError::NA),
            0x2B => Some(CellError::GettingData),
            _ => None,
        }
    }

    pub fn literal(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::NA => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (also used for error cells, see [`Cell::error`])
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// 64-bit floating point number
    Number(f64),
    /// Date/time value, converted from a serial number with a date format
    DateTime(NaiveDateTime),
    /// String value
    String(String),
}

impl CellValue {
    pub const EMPTY: &'static CellValue = &CellValue::Empty;

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Name of the value's type, as reported by the cursor.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Bool(_) => "bool",
            CellValue::Number(_) => "number",
            CellValue::DateTime(_) => "datetime",
            CellValue::String(_) => "string",
        }
    }
}

/// Horizontal alignment values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HorizontalAlignment {
    #[default]
    General = 0,
    Left = 1,
    Center = 2,
    Right = 3,
    Fill = 4,
    Justify = 5,
    CenterContinuous = 6,
    Distributed = 7,
}

impl HorizontalAlignment {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => HorizontalAlignment::Left,
            2 => HorizontalAlignment::Center,
            3 => HorizontalAlignment::Right,
            4 => HorizontalAlignment::Fill,
            5 => HorizontalAlignment::Justify,
            6 => HorizontalAlignment::CenterContinuous,
            7 => HorizontalAlignment::Distributed,
            _ => HorizontalAlignment::General,
        }
    }
}

/// Effective formatting attributes of a cell.
///
/// `Default` is what the cursor reports for a cell with no style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub font_index: u32,
    pub number_format_index: u32,
    pub indent_level: u8,
    pub horizontal_alignment: HorizontalAlignment,
    pub hidden: bool,
    pub locked: bool,
}

/// A number format code and whether it renders serials as dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatString {
    pub format_string: String,
    pub is_date_format: bool,
}

/// A single materialized cell.
///
/// Owned by the [`Row`] that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Zero-based column index, the only key used to place the cell in a row
    pub column_index: usize,
    pub value: CellValue,
    pub error: Option<CellError>,
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn new(column_index: usize, value: CellValue) -> Self {
        Cell {
            column_index,
            value,
            error: None,
            style: None,
        }
    }
}

/// One worksheet row: its cells in file order and its height in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: u32,
    pub height: f64,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: u32, height: f64) -> Self {
        Row {
            index,
            height,
            cells: Vec::new(),
        }
    }
}

/// Inclusive, zero-based cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub from_row: u32,
    pub from_column: u32,
    pub to_row: u32,
    pub to_column: u32,
}

impl CellRange {
    pub fn new(from_row: u32, from_column: u32, to_row: u32, to_column: u32) -> Self {
        CellRange {
            from_row,
            from_column,
            to_row,
            to_column,
        }
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        (self.from_row..=self.to_row).contains(&row)
            && (self.from_column..=self.to_column).contains(&column)
    }
}

/// Width declared for an inclusive range of columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    pub minimum: u32,
    pub maximum: u32,
    /// Width in character units
    pub width: f64,
    pub hidden: bool,
    pub custom_width: bool,
}

/// Page header/footer text of a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderFooter {
    pub has_different_odd_even: bool,
    pub has_different_first: bool,
    pub scale_with_doc: bool,
    pub align_with_margins: bool,
    pub odd_header: Option<String>,
    pub odd_footer: Option<String>,
    pub even_header: Option<String>,
    pub even_footer: Option<String>,
    pub first_header: Option<String>,
    pub first_footer: Option<String>,
}

//! Test-only record stream builder.
//!
//! Emits varint-framed BIFF12 records so decoder and cursor tests can run
//! against byte-exact input without a real container.

use crate::ooxml::xlsb::records::record_types;

/// BIFF12 record stream writer
#[derive(Debug, Default)]
pub struct RecordWriter {
    buffer: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with a variable-length type and size header
    pub fn record(mut self, record_type: u32, payload: &[u8]) -> Self {
        write_varint(&mut self.buffer, record_type);
        write_varint(&mut self.buffer, payload.len() as u32);
        self.buffer.extend_from_slice(payload);
        self
    }

    /// Append raw bytes with no framing (for truncation tests)
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Little-endian payload builder
#[derive(Debug, Default, Clone)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn f64(mut self, value: f64) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn zeros(mut self, count: usize) -> Self {
        self.bytes.resize(self.bytes.len() + count, 0);
        self
    }

    /// XLWideString: u32 character count followed by UTF-16LE
    pub fn wide_str(mut self, s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.bytes.extend_from_slice(&(units.len() as u32).to_le_bytes());
        for unit in units {
            self.bytes.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }

    /// XLNullableWideString: `None` is written as count 0xFFFFFFFF
    pub fn nullable_wide_str(self, s: Option<&str>) -> Self {
        match s {
            Some(s) => self.wide_str(s),
            None => self.u32(0xFFFF_FFFF),
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn workbook_prop(date1904: bool) -> Vec<u8> {
    Payload::new().u8(u8::from(date1904)).zeros(11).build()
}

pub fn bundle_sheet(state: u32, id: u32, rel_id: Option<&str>, name: &str) -> Vec<u8> {
    Payload::new()
        .u32(state)
        .u32(id)
        .nullable_wide_str(rel_id)
        .wide_str(name)
        .build()
}

pub fn book_view(active_tab: u32) -> Vec<u8> {
    Payload::new().zeros(24).u32(active_tab).zeros(5).build()
}

pub fn row_header(row: u32, height_twips: u16) -> Vec<u8> {
    Payload::new().u32(row).u32(0).u16(height_twips).zeros(8).build()
}

fn cell_prefix(column: u32, style: u32) -> Payload {
    Payload::new().u32(column).u32(style & 0x00FF_FFFF)
}

pub fn cell_real(column: u32, style: u32, value: f64) -> Vec<u8> {
    cell_prefix(column, style).f64(value).build()
}

pub fn cell_rk(column: u32, style: u32, rk: u32) -> Vec<u8> {
    cell_prefix(column, style).u32(rk).build()
}

pub fn cell_bool(column: u32, style: u32, value: bool) -> Vec<u8> {
    cell_prefix(column, style).u8(u8::from(value)).build()
}

pub fn cell_error(column: u32, style: u32, code: u8) -> Vec<u8> {
    cell_prefix(column, style).u8(code).build()
}

pub fn cell_str(column: u32, style: u32, value: &str) -> Vec<u8> {
    cell_prefix(column, style).wide_str(value).build()
}

pub fn cell_isst(column: u32, style: u32, index: u32) -> Vec<u8> {
    cell_prefix(column, style).u32(index).build()
}

pub fn cell_blank(column: u32, style: u32) -> Vec<u8> {
    cell_prefix(column, style).build()
}

pub fn dimension(rw_first: u32, rw_last: u32, col_first: u32, col_last: u32) -> Vec<u8> {
    Payload::new()
        .u32(rw_first)
        .u32(rw_last)
        .u32(col_first)
        .u32(col_last)
        .build()
}

pub fn col_info(first: u32, last: u32, width: f64, hidden: bool) -> Vec<u8> {
    let flags = if hidden { 0x0001 } else { 0x0002 };
    Payload::new()
        .u32(first)
        .u32(last)
        .u32((width * 256.0) as u32)
        .u32(0)
        .u16(flags)
        .build()
}

pub fn merge_cell(rw_first: u32, rw_last: u32, col_first: u32, col_last: u32) -> Vec<u8> {
    dimension(rw_first, rw_last, col_first, col_last)
}

pub fn ws_prop(code_name: &str) -> Vec<u8> {
    Payload::new().zeros(19).wide_str(code_name).build()
}

/// BrtWsFmtInfo with the given default row height
pub fn ws_fmt_info(default_height_twips: u16) -> Vec<u8> {
    Payload::new()
        .u32(0xFFFF_FFFF)
        .u16(8)
        .u16(default_height_twips)
        .zeros(4)
        .build()
}

pub fn header_footer(flags: u16, strings: [Option<&str>; 6]) -> Vec<u8> {
    strings
        .iter()
        .fold(Payload::new().u16(flags), |p, s| p.nullable_wide_str(*s))
        .build()
}

pub fn num_fmt(id: u16, code: &str) -> Vec<u8> {
    Payload::new().u16(id).wide_str(code).build()
}

/// BrtXF with the given format/font ids, indent, and flag word
pub fn xf(num_fmt: u16, font: u16, indent: u8, flags: u16) -> Vec<u8> {
    Payload::new()
        .u16(0xFFFF)
        .u16(num_fmt)
        .u16(font)
        .u16(0)
        .u16(0)
        .u8(0)
        .u8(indent)
        .u16(flags)
        .zeros(2)
        .build()
}

pub fn sst_item(s: &str) -> Vec<u8> {
    Payload::new().u8(0).wide_str(s).build()
}

/// Minimal worksheet stream: dimension, then one RowHeader per row with its cells.
pub fn worksheet(field_count: u32, rows: &[(u32, Vec<(u32, Vec<u8>)>)]) -> Vec<u8> {
    let row_last = rows.iter().map(|(r, _)| *r).max().unwrap_or(0);
    let mut writer = RecordWriter::new()
        .record(record_types::BEGIN_SHEET, &[])
        .record(
            record_types::WS_DIM,
            &dimension(0, row_last, 0, field_count.saturating_sub(1)),
        )
        .record(record_types::BEGIN_SHEET_DATA, &[]);
    for (row, cells) in rows {
        writer = writer.record(record_types::ROW_HDR, &row_header(*row, 300));
        for (record_type, payload) in cells {
            writer = writer.record(*record_type, payload);
        }
    }
    writer
        .record(record_types::END_SHEET_DATA, &[])
        .record(record_types::END_SHEET, &[])
        .finish()
}

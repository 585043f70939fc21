//! XLSB styles table parsing
//!
//! Only what cell value resolution needs is kept from the stylesheet part:
//! the number format table and the cell XF list. Fonts, fills and borders are
//! referenced by index and never dereferenced.
//! Reference: [MS-XLSB] Section 2.1.7.50 - Styles

use crate::ooxml::xlsb::error::XlsbResult;
use crate::ooxml::xlsb::reader::{BiffReader, RecordDecoder};
use crate::ooxml::xlsb::records::{
    FormatRecord, Record, Section, XfFlags, XfRecord, get_byte, get_word,
    get_wide_string, record_types,
};
use crate::sheet::date::{is_builtin_date_format, is_date_format_string};
use crate::sheet::types::{CellStyle, HorizontalAlignment, NumberFormatString};
use std::collections::HashMap;
use std::io::Read;

/// Decoder for the stylesheet part
#[derive(Debug, Default)]
pub struct StylesDecoder;

impl RecordDecoder for StylesDecoder {
    fn decode(&mut self, buffer: &[u8], record_type: u32, _record_len: u32) -> XlsbResult<Record> {
        let record = match record_type {
            record_types::BEGIN_FMTS => Record::BeginSection(Section::Formats),
            record_types::END_FMTS => Record::EndSection(Section::Formats),
            record_types::BEGIN_CELL_XFS => Record::BeginSection(Section::CellXfs),
            record_types::END_CELL_XFS => Record::EndSection(Section::CellXfs),
            record_types::BEGIN_CELL_STYLE_XFS => Record::BeginSection(Section::CellStyleXfs),
            record_types::END_CELL_STYLE_XFS => Record::EndSection(Section::CellStyleXfs),
            record_types::FMT => {
                let mut offset = 2;
                Record::NumberFormat(FormatRecord {
                    id: get_word(buffer, 0)?,
                    format_code: get_wide_string(buffer, &mut offset)?,
                })
            },
            record_types::XF => Record::ExtendedFormat(XfRecord {
                num_fmt_id: get_word(buffer, 2)?,
                font_id: get_word(buffer, 4)?,
                indent: get_byte(buffer, 11)?,
                flags: XfFlags::from_bits_retain(get_word(buffer, 12)?),
            }),
            _ => Record::Ignored,
        };
        Ok(record)
    }
}

/// Styles table container
#[derive(Debug, Clone)]
pub struct StylesTable {
    num_fmts: HashMap<u32, NumberFormatString>,
    cell_xfs: Vec<XfRecord>,
}

impl Default for StylesTable {
    fn default() -> Self {
        StylesTable {
            num_fmts: Self::builtin_formats(),
            cell_xfs: Vec::new(),
        }
    }
}

impl StylesTable {
    /// Load styles from styles.bin content
    pub fn from_reader<R: Read>(reader: R) -> XlsbResult<Self> {
        let mut styles = StylesTable::default();
        let mut section = None;

        for record in BiffReader::new(reader, StylesDecoder) {
            match record? {
                Record::BeginSection(s) => section = Some(s),
                Record::EndSection(_) => section = None,
                Record::NumberFormat(fmt) => {
                    let id = u32::from(fmt.id);
                    styles.num_fmts.insert(id, Self::format_string(id, fmt.format_code));
                },
                // named style XFs are not consulted when resolving a cell
                Record::ExtendedFormat(xf) if section == Some(Section::CellXfs) => {
                    styles.cell_xfs.push(xf);
                },
                _ => {},
            }
        }

        Ok(styles)
    }

    fn format_string(id: u32, format_string: String) -> NumberFormatString {
        let is_date_format = is_builtin_date_format(id) || is_date_format_string(&format_string);
        NumberFormatString {
            format_string,
            is_date_format,
        }
    }

    /// Built-in number formats 0-49
    fn builtin_formats() -> HashMap<u32, NumberFormatString> {
        const BUILTIN: &[(u32, &str)] = &[
            (0, "General"),
            (1, "0"),
            (2, "0.00"),
            (3, "#,##0"),
            (4, "#,##0.00"),
            (5, "\"$\"#,##0_);(\"$\"#,##0)"),
            (6, "\"$\"#,##0_);[Red](\"$\"#,##0)"),
            (7, "\"$\"#,##0.00_);(\"$\"#,##0.00)"),
            (8, "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)"),
            (9, "0%"),
            (10, "0.00%"),
            (11, "0.00E+00"),
            (12, "# ?/?"),
            (13, "# ??/??"),
            (14, "mm-dd-yy"),
            (15, "d-mmm-yy"),
            (16, "d-mmm"),
            (17, "mmm-yy"),
            (18, "h:mm AM/PM"),
            (19, "h:mm:ss AM/PM"),
            (20, "h:mm"),
            (21, "h:mm:ss"),
            (22, "m/d/yy h:mm"),
            (37, "#,##0 ;(#,##0)"),
            (38, "#,##0 ;[Red](#,##0)"),
            (39, "#,##0.00;(#,##0.00)"),
            (40, "#,##0.00;[Red](#,##0.00)"),
            (41, "_(* #,##0_);_(* \\(#,##0\\);_(* \"-\"_);_(@_)"),
            (42, "_(\"$\"* #,##0_);_(\"$\"* \\(#,##0\\);_(\"$\"* \"-\"_);_(@_)"),
            (43, "_(* #,##0.00_);_(* \\(#,##0.00\\);_(* \"-\"??_);_(@_)"),
            (44, "_(\"$\"* #,##0.00_);_(\"$\"* \\(#,##0.00\\);_(\"$\"* \"-\"??_);_(@_)"),
            (45, "mm:ss"),
            (46, "[h]:mm:ss"),
            (47, "mmss.0"),
            (48, "##0.0E+0"),
            (49, "@"),
        ];
        BUILTIN
            .iter()
            .map(|&(id, code)| (id, Self::format_string(id, code.to_string())))
            .collect()
    }

    /// Get number format by ID
    pub fn number_format(&self, id: u32) -> Option<&NumberFormatString> {
        self.num_fmts.get(&id)
    }

    /// Get the cell XF at `index`
    pub fn cell_format(&self, index: u32) -> Option<&XfRecord> {
        self.cell_xfs.get(index as usize)
    }

    /// Effective style for a cell's style index.
    pub fn cell_style(&self, index: u32) -> Option<CellStyle> {
        self.cell_format(index).map(|xf| CellStyle {
            font_index: u32::from(xf.font_id),
            number_format_index: u32::from(xf.num_fmt_id),
            indent_level: xf.indent,
            horizontal_alignment: HorizontalAlignment::from_u8(xf.flags.horizontal_alignment()),
            hidden: xf.flags.contains(XfFlags::HIDDEN),
            locked: xf.flags.contains(XfFlags::LOCKED),
        })
    }

    /// Whether numbers with this style index should be read as dates.
    pub fn is_date_style(&self, index: u32) -> bool {
        self.cell_format(index)
            .and_then(|xf| self.number_format(u32::from(xf.num_fmt_id)))
            .is_some_and(|fmt| fmt.is_date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsb::fixtures::{self, RecordWriter};
    use std::io::Cursor;

    fn stylesheet() -> Vec<u8> {
        RecordWriter::new()
            .record(record_types::BEGIN_FMTS, &[1, 0, 0, 0])
            .record(record_types::FMT, &fixtures::num_fmt(164, "yyyy\\-mm\\-dd"))
            .record(record_types::FMT, &fixtures::num_fmt(165, "0.000"))
            .record(record_types::END_FMTS, &[])
            .record(record_types::BEGIN_CELL_STYLE_XFS, &[1, 0, 0, 0])
            .record(record_types::XF, &fixtures::xf(0, 0, 0, 0))
            .record(record_types::END_CELL_STYLE_XFS, &[])
            .record(record_types::BEGIN_CELL_XFS, &[3, 0, 0, 0])
            .record(record_types::XF, &fixtures::xf(0, 0, 0, 0x1000))
            .record(record_types::XF, &fixtures::xf(164, 2, 3, 0x2002))
            .record(record_types::XF, &fixtures::xf(165, 1, 0, 0x0003))
            .record(record_types::END_CELL_XFS, &[])
            .finish()
    }

    #[test]
    fn test_builtin_formats_seeded() {
        let styles = StylesTable::default();
        assert_eq!(styles.number_format(0).unwrap().format_string, "General");
        assert!(styles.number_format(14).unwrap().is_date_format);
        assert!(!styles.number_format(49).unwrap().is_date_format);
        assert!(styles.number_format(164).is_none());
    }

    #[test]
    fn test_sections_and_xfs() {
        let styles = StylesTable::from_reader(Cursor::new(stylesheet())).unwrap();
        // the named style XF does not shift the cell XF indices
        assert_eq!(styles.cell_format(0).unwrap().flags, XfFlags::LOCKED);

        let custom = styles.number_format(164).unwrap();
        assert_eq!(custom.format_string, "yyyy\\-mm\\-dd");
        assert!(custom.is_date_format);
        assert!(!styles.number_format(165).unwrap().is_date_format);

        let style = styles.cell_style(1).unwrap();
        assert_eq!(style.number_format_index, 164);
        assert_eq!(style.font_index, 2);
        assert_eq!(style.indent_level, 3);
        assert_eq!(style.horizontal_alignment, HorizontalAlignment::Center);
        assert!(style.hidden);
        assert!(!style.locked);

        assert!(styles.cell_style(0).unwrap().locked);
        assert!(styles.cell_style(3).is_none());
    }

    #[test]
    fn test_is_date_style() {
        let styles = StylesTable::from_reader(Cursor::new(stylesheet())).unwrap();
        assert!(!styles.is_date_style(0));
        assert!(styles.is_date_style(1));
        assert!(!styles.is_date_style(2));
        assert!(!styles.is_date_style(99));
    }

    #[test]
    fn test_truncated_xf_is_malformed() {
        let bytes = RecordWriter::new()
            .record(record_types::BEGIN_CELL_XFS, &[])
            .record(record_types::XF, &[0; 6])
            .finish();
        let err = StylesTable::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(err.is_malformed());
    }
}

//! Shared string table (sharedStrings.bin)

use crate::ooxml::xlsb::error::XlsbResult;
use crate::ooxml::xlsb::reader::{BiffReader, RecordDecoder};
use crate::ooxml::xlsb::records::{Record, Section, get_wide_string, record_types};
use std::io::Read;

/// Decoder for the shared string part
#[derive(Debug, Default)]
pub struct SharedStringsDecoder;

impl RecordDecoder for SharedStringsDecoder {
    fn decode(&mut self, buffer: &[u8], record_type: u32, _record_len: u32) -> XlsbResult<Record> {
        let record = match record_type {
            record_types::BEGIN_SST => Record::BeginSection(Section::SharedStrings),
            record_types::END_SST => Record::EndSection(Section::SharedStrings),
            record_types::SST_ITEM => {
                // flags byte (rich text / phonetic runs) precedes the string
                let mut offset = 1;
                Record::SharedString(get_wide_string(buffer, &mut offset)?)
            },
            _ => Record::Ignored,
        };
        Ok(record)
    }
}

/// Strings referenced by index from `BrtCellIsst` cells
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    strings: Vec<String>,
}

impl SharedStringTable {
    pub fn from_reader<R: Read>(reader: R) -> XlsbResult<Self> {
        let mut strings = Vec::new();
        for record in BiffReader::new(reader, SharedStringsDecoder) {
            match record? {
                Record::SharedString(s) => strings.push(s),
                Record::EndSection(Section::SharedStrings) => break,
                _ => {},
            }
        }
        Ok(SharedStringTable { strings })
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

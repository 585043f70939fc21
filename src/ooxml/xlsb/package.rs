//! Access to the binary parts of a workbook package.
//!
//! Unpacking the container is left to the caller; the reader only needs the
//! bytes of individual parts by path.

use bytes::Bytes;
use std::collections::HashMap;

/// Supplies part contents by package path (e.g. `xl/worksheets/sheet1.bin`).
pub trait PartProvider {
    /// Contents of the part at `path`, or `None` if the package has no such part.
    fn part(&self, path: &str) -> Option<Bytes>;
}

/// In-memory package holding already-extracted parts.
///
/// # Examples
///
/// ```rust
/// use xlsb_cursor::ooxml::xlsb::{PartProvider, XlsbPackage};
///
/// let package = XlsbPackage::new().with_part("xl/workbook.bin", vec![0x83, 0x01, 0x00]);
/// assert!(package.part("/xl/workbook.bin").is_some());
/// assert!(package.part("xl/styles.bin").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct XlsbPackage {
    parts: HashMap<String, Bytes>,
}

impl XlsbPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part, builder style
    pub fn with_part(mut self, path: impl AsRef<str>, data: impl Into<Bytes>) -> Self {
        self.insert(path, data);
        self
    }

    /// Add or replace a part
    pub fn insert(&mut self, path: impl AsRef<str>, data: impl Into<Bytes>) {
        self.parts.insert(normalize(path.as_ref()), data.into());
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl PartProvider for XlsbPackage {
    fn part(&self, path: &str) -> Option<Bytes> {
        // Bytes clones share the buffer
        self.parts.get(&normalize(path)).cloned()
    }
}

impl<P: PartProvider + ?Sized> PartProvider for &P {
    fn part(&self, path: &str) -> Option<Bytes> {
        (**self).part(path)
    }
}

/// Package paths are compared without a leading slash
fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

//! Worksheet cache shared by every pass of a cursor.
//!
//! The first pass pulls worksheets from the workbook's live producer and
//! appends each one to a buffer; later passes replay the buffer and only fall
//! through to the producer for indices not reached yet. The producer is
//! created at most once and only ever advanced, so a worksheet is constructed
//! once no matter how often the cursor is reset.

use super::traits::Workbook;
use crate::common::Result;
use log::debug;

pub struct WorksheetCache<W: Workbook> {
    worksheets: Vec<W::Worksheet>,
    live: Option<W::Worksheets>,
    drained: bool,
}

impl<W: Workbook> Default for WorksheetCache<W> {
    fn default() -> Self {
        WorksheetCache {
            worksheets: Vec::new(),
            live: None,
            drained: false,
        }
    }
}

impl<W: Workbook> WorksheetCache<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worksheet at `index`, constructing it (and any before it) on first use.
    ///
    /// Returns `Ok(None)` past the last worksheet. An error from the producer
    /// ends production; worksheets already cached stay available.
    pub fn get(&mut self, workbook: &W, index: usize) -> Result<Option<&W::Worksheet>> {
        while self.worksheets.len() <= index && !self.drained {
            let live = self.live.get_or_insert_with(|| workbook.read_worksheets());
            match live.next() {
                Some(Ok(worksheet)) => self.worksheets.push(worksheet),
                Some(Err(e)) => {
                    self.finish();
                    return Err(e);
                },
                None => self.finish(),
            }
        }
        Ok(self.worksheets.get(index))
    }

    /// Already-constructed worksheet at `index`; never pulls from the producer.
    pub fn cached(&self, index: usize) -> Option<&W::Worksheet> {
        self.worksheets.get(index)
    }

    pub fn len(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Drop every cached worksheet and the live producer.
    pub fn clear(&mut self) {
        self.worksheets.clear();
        self.live = None;
        self.drained = false;
    }

    fn finish(&mut self) {
        if !self.drained {
            debug!("worksheet production finished after {} sheets", self.worksheets.len());
        }
        self.drained = true;
        self.live = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::sheet::tests::CountingWorkbook;
    use crate::sheet::traits::Worksheet;

    #[test]
    fn test_constructs_each_worksheet_once() {
        let workbook = CountingWorkbook::new(&[1, 2, 3]);
        let mut cache = WorksheetCache::new();

        for _ in 0..3 {
            let mut index = 0;
            while cache.get(&workbook, index).unwrap().is_some() {
                index += 1;
            }
            assert_eq!(index, 3);
        }
        assert_eq!(workbook.constructed(), 3);
        assert_eq!(workbook.producers(), 1);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_partial_pass_then_replay() {
        let workbook = CountingWorkbook::new(&[1, 1, 1, 1]);
        let mut cache = WorksheetCache::new();

        assert!(cache.get(&workbook, 1).unwrap().is_some());
        assert_eq!(workbook.constructed(), 2);
        assert!(cache.cached(2).is_none());

        assert_eq!(cache.get(&workbook, 0).unwrap().unwrap().name(), "Sheet1");
        assert_eq!(workbook.constructed(), 2);

        assert!(cache.get(&workbook, 3).unwrap().is_some());
        assert!(cache.get(&workbook, 4).unwrap().is_none());
        assert_eq!(workbook.constructed(), 4);
        assert_eq!(workbook.producers(), 1);
    }

    #[test]
    fn test_producer_error_stops_production() {
        let workbook = CountingWorkbook::new(&[1, 1, 1]).failing_at(1);
        let mut cache = WorksheetCache::new();

        assert!(cache.get(&workbook, 0).unwrap().is_some());
        assert!(matches!(cache.get(&workbook, 1), Err(Error::MissingPart(_))));
        assert!(cache.get(&workbook, 2).unwrap().is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_restarts_production() {
        let workbook = CountingWorkbook::new(&[1]);
        let mut cache = WorksheetCache::new();
        assert!(cache.get(&workbook, 0).unwrap().is_some());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&workbook, 0).unwrap().is_some());
        assert_eq!(workbook.producers(), 2);
    }
}

//! Tracker exported as CSV (same column positions as the workbook).

use super::row::{cell_text, Row};
use super::TabularSource;
use crate::error::ImportError;
use std::io::Read;

pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
    first_row: usize,
}

impl CsvSource<std::fs::File> {
    pub fn from_path(path: &std::path::Path, first_row: usize) -> Result<Self, ImportError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ImportError::Tracker(format!("failed to open {}: {e}", path.display())))?;
        Ok(CsvSource::from_reader(file, first_row))
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, first_row: usize) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        CsvSource { reader, first_row }
    }
}

impl<R: Read> TabularSource for CsvSource<R> {
    fn rows(&mut self) -> Result<Vec<Row>, ImportError> {
        let mut rows = Vec::new();
        for (i, record) in self.reader.records().enumerate() {
            let number = i + 1;
            let record = record
                .map_err(|e| ImportError::Tracker(format!("row {number}: {e}")))?;
            if number < self.first_row {
                continue;
            }
            rows.push(Row::new(number, record.iter().map(cell_text).collect()));
        }
        Ok(rows)
    }
}

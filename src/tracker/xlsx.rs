//! Workbook reader (xlsx/xlsm/xls/ods) via calamine.

use super::row::{cell_text, Row};
use super::TabularSource;
use crate::error::ImportError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::PathBuf;

pub struct XlsxSource {
    path: PathBuf,
    sheet: Option<String>,
    first_row: usize,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>, first_row: usize) -> Self {
        XlsxSource {
            path: path.into(),
            sheet,
            first_row,
        }
    }
}

/// Render a workbook cell as text. Whole floats drop the fraction since
/// serial numbers and VLAN tags are often typed as numbers.
fn data_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => cell_text(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some((*f as i64).to_string())
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string().to_uppercase()),
        other => cell_text(&other.to_string()),
    }
}

impl TabularSource for XlsxSource {
    fn rows(&mut self) -> Result<Vec<Row>, ImportError> {
        let path = self.path.display().to_string();
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| ImportError::Tracker(format!("failed to open {path}: {e}")))?;

        let sheet = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| ImportError::Tracker(format!("{path} has no worksheets")))?,
        };
        log::info!("Reading worksheet '{sheet}' from {path}");

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| ImportError::Tracker(format!("failed to read sheet '{sheet}': {e}")))?;

        // Range is anchored at the first used cell, not at A1.
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let rows = range
            .rows()
            .enumerate()
            .map(|(i, cells)| {
                let mut text = vec![None; col_offset];
                text.extend(cells.iter().map(data_text));
                Row::new(row_offset + i + 1, text)
            })
            .filter(|row| row.number >= self.first_row)
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_text() {
        assert_eq!(data_text(&Data::Empty), None);
        assert_eq!(data_text(&Data::String("  ".to_string())), None);
        assert_eq!(data_text(&Data::Float(4321.0)), Some("4321".to_string()));
        assert_eq!(data_text(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(data_text(&Data::Int(218)), Some("218".to_string()));
        assert_eq!(
            data_text(&Data::String(" ISR1111X-8P ".to_string())),
            Some("ISR1111X-8P".to_string())
        );
    }

    #[test]
    fn test_missing_workbook_is_tracker_error() {
        let mut source = XlsxSource::new("src/tests/test_data/missing.xlsx", None, 4);
        assert!(matches!(source.rows(), Err(ImportError::Tracker(_))));
    }
}

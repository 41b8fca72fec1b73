//! Tracker sheet input.
//!
//! - [`row`] - fixed column layout and row cells
//! - [`xlsx`] - workbook reader (calamine)
//! - [`csv_source`] - CSV export reader

mod csv_source;
mod row;
mod xlsx;

use crate::config::Config;
use crate::error::ImportError;

pub use csv_source::CsvSource;
pub use row::{cell_text, Column, Row};
pub use xlsx::XlsxSource;

/// Yields the tracker's data rows, header region removed.
pub trait TabularSource {
    fn rows(&mut self) -> Result<Vec<Row>, ImportError>;
}

/// Pick a reader from the tracker file extension.
pub fn open_tracker(config: &Config) -> Result<Box<dyn TabularSource>, ImportError> {
    let path = &config.tracker_path;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvSource::from_path(path, config.first_row)?)),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(XlsxSource::new(
            path.clone(),
            config.tracker_sheet.clone(),
            config.first_row,
        ))),
        _ => Err(ImportError::Tracker(format!(
            "unsupported tracker file type: {}",
            path.display()
        ))),
    }
}

/// Read every data row, reporting how many were found.
pub fn read_tracker(source: &mut dyn TabularSource) -> Result<Vec<Row>, ImportError> {
    let rows = source.rows()?;
    println!("{} rows found ...\n", rows.len());
    log::info!("tracker rows found: {}", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_tracker_by_extension() {
        let config = Config {
            tracker_path: PathBuf::from("src/tests/test_data/tracker_01.csv"),
            ..Config::default()
        };
        let mut source = open_tracker(&config).expect("csv tracker should open");
        assert!(!source.rows().unwrap().is_empty());

        let config = Config {
            tracker_path: PathBuf::from("tracker.txt"),
            ..Config::default()
        };
        assert!(matches!(open_tracker(&config), Err(ImportError::Tracker(_))));
    }
}

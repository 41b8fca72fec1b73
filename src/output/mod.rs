//! Run outputs.
//!
//! - [`import_csv`] - the vManage import file
//! - [`terminal`] - operator report on stdout

mod import_csv;
mod terminal;

pub use import_csv::{build_table, write_import_csv, write_table, ImportTable, IMPORT_COLUMNS};
pub use terminal::{
    format_field, print_route_report, print_skipped, print_unresolved, route_lines,
    skipped_lines, unresolved_line,
};

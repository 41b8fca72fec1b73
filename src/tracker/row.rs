//! Tracker sheet row and fixed column layout.

use std::fmt;

/// Tracker columns used by the import, at fixed 1-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Model,
    Serial,
    CircuitType,
    WanDescription,
    Bandwidth,
    WanIp,
    VlanTag,
    PublicPrefix,
    Hostname,
    Loopback,
    Vlan5,
    Vlan10,
    Vlan218,
}

impl Column {
    /// 1-based spreadsheet column number.
    pub fn number(self) -> usize {
        match self {
            Column::Model => 3,
            Column::Serial => 4,
            Column::CircuitType => 5,
            Column::WanDescription => 6,
            Column::Bandwidth => 7,
            Column::WanIp => 8,
            Column::VlanTag => 10,
            Column::PublicPrefix => 11,
            Column::Hostname => 13,
            Column::Loopback => 14,
            Column::Vlan5 => 16,
            Column::Vlan10 => 17,
            Column::Vlan218 => 18,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Model => "model",
            Column::Serial => "serial",
            Column::CircuitType => "circuit type",
            Column::WanDescription => "WAN description",
            Column::Bandwidth => "bandwidth",
            Column::WanIp => "WAN IP",
            Column::VlanTag => "VLAN tag",
            Column::PublicPrefix => "public /29",
            Column::Hostname => "hostname",
            Column::Loopback => "loopback",
            Column::Vlan5 => "VLAN5",
            Column::Vlan10 => "VLAN10",
            Column::Vlan218 => "VLAN218",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One data row; `cells[0]` is spreadsheet column 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// 1-based sheet row number.
    pub number: usize,
    pub cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<Option<String>>) -> Self {
        Row { number, cells }
    }

    /// Build a row from `(column, text)` pairs; handy for fixtures.
    pub fn from_columns(number: usize, values: &[(Column, &str)]) -> Self {
        let width = values.iter().map(|(c, _)| c.number()).max().unwrap_or(0);
        let mut cells = vec![None; width];
        for (column, text) in values {
            cells[column.number() - 1] = cell_text(text);
        }
        Row { number, cells }
    }

    pub fn cell(&self, column: Column) -> Option<&str> {
        self.cells
            .get(column.number() - 1)
            .and_then(|c| c.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Normalise raw cell text: trimmed, `None` when empty.
pub fn cell_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_lookup_by_column() {
        let row = Row::from_columns(
            4,
            &[(Column::Serial, "FGL2231A0BC"), (Column::Vlan218, " 10.3.0.0/24 ")],
        );
        assert_eq!(row.cells.len(), 18);
        assert_eq!(row.cell(Column::Serial), Some("FGL2231A0BC"));
        assert_eq!(row.cell(Column::Vlan218), Some("10.3.0.0/24"));
        assert_eq!(row.cell(Column::Model), None);
        assert!(!row.is_blank());
    }

    #[test]
    fn test_short_row_has_no_trailing_cells() {
        let row = Row::new(9, vec![None, Some("x".to_string())]);
        assert_eq!(row.cell(Column::Hostname), None);
        assert!(Row::new(10, vec![None, None]).is_blank());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text("  "), None);
        assert_eq!(cell_text(" MPLS "), Some("MPLS".to_string()));
    }
}

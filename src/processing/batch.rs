//! Fold of tracker rows into one immutable [`ImportBatch`].

use super::normalize::{Normalizer, RowOutcome};
use crate::error::{ImportError, SkipReason};
use crate::models::{DeviceRecord, Ipv4};
use crate::tracker::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Accepted records in sheet order plus the rows left out.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub records: Vec<DeviceRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportBatch {
    /// Postcodes in record order, duplicates kept.
    pub fn postcodes(&self) -> Vec<String> {
        self.records.iter().map(|r| r.postcode.clone()).collect()
    }

    /// Public prefixes in record order, duplicates kept.
    pub fn public_prefixes(&self) -> Vec<Ipv4> {
        self.records.iter().filter_map(|r| r.public_prefix).collect()
    }
}

/// Normalise every row. Stops at the first run-fatal error; skipped rows
/// are logged and collected.
pub fn build_batch(rows: &[Row], normalizer: &Normalizer) -> Result<ImportBatch, ImportError> {
    rows.iter().try_fold(ImportBatch::default(), |mut batch, row| {
        if row.is_blank() {
            log::debug!("row {}: blank", row.number);
            return Ok(batch);
        }
        match normalizer.normalize(row)? {
            RowOutcome::Accepted(record) => batch.records.push(*record),
            RowOutcome::Skipped(reason) => {
                log::warn!("row {}: skipped, {reason}", row.number);
                batch.skipped.push(SkippedRow {
                    row: row.number,
                    reason,
                });
            }
        }
        Ok(batch)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NextHopOverrides;
    use crate::tracker::Column;

    fn site_row(number: usize, hostname: &str, wan_ip: &str, public: &str) -> Row {
        let serial = format!("FGL{number:04}");
        let loopback = format!("10.255.0.{number}");
        Row::from_columns(
            number,
            &[
                (Column::Model, "C1111-8P"),
                (Column::Serial, serial.as_str()),
                (Column::Bandwidth, "100/20M"),
                (Column::WanIp, wan_ip),
                (Column::PublicPrefix, public),
                (Column::Hostname, hostname),
                (Column::Loopback, loopback.as_str()),
                (Column::Vlan5, "10.1.0.0/24"),
                (Column::Vlan10, "10.2.0.0/24"),
                (Column::Vlan218, "10.3.0.0/24"),
            ],
        )
    }

    #[test]
    fn test_order_and_side_lists() {
        let rows = vec![
            site_row(4, "CPE-BR-001-LS11UR", "81.2.69.11/31", "192.0.2.8/29"),
            site_row(5, "CPE-BR-002-YO17HH", "", "192.0.2.16/29"),
            Row::new(6, vec![None; 18]),
            site_row(7, "CPE-BR-003-LS11UR", "81.2.69.13/31", "192.0.2.8/29"),
            site_row(8, "CPE-BR-004-M11AE", "81.2.69.15/31", "192.0.2.33/29"),
        ];
        let overrides = NextHopOverrides::builtin();
        let batch = build_batch(&rows, &Normalizer::new(&overrides)).unwrap();

        let accepted: Vec<usize> = batch.records.iter().map(|r| r.row).collect();
        assert_eq!(accepted, vec![4, 7, 8]);
        assert_eq!(
            batch.skipped,
            vec![SkippedRow {
                row: 5,
                reason: SkipReason::NoCircuit
            }]
        );
        // Row without a circuit contributes nothing to either side list
        assert_eq!(batch.postcodes(), vec!["LS11UR", "LS11UR", "M11AE"]);
        let prefixes: Vec<String> = batch.public_prefixes().iter().map(|p| p.to_string()).collect();
        assert_eq!(prefixes, vec!["192.0.2.8/29", "192.0.2.8/29"]);
    }

    #[test]
    fn test_bad_public_prefix_only_skips_its_row() {
        let rows = vec![
            site_row(4, "CPE-BR-001-LS11UR", "81.2.69.11/31", "192.0.2.8/29"),
            site_row(5, "CPE-BR-002-YO17HH", "81.2.69.13/31", "192.0.2.x/29"),
            site_row(6, "CPE-BR-003-HU12AA", "81.2.69.15/31", ""),
        ];
        let overrides = NextHopOverrides::builtin();
        let batch = build_batch(&rows, &Normalizer::new(&overrides)).unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].row, 4);
        let reasons: Vec<(usize, SkipReason)> =
            batch.skipped.iter().map(|s| (s.row, s.reason.clone())).collect();
        assert_eq!(
            reasons,
            vec![
                (5, SkipReason::BadPublicPrefix("192.0.2.x/29".to_string())),
                (6, SkipReason::NoPublicPrefix),
            ]
        );
        assert_eq!(batch.postcodes(), vec!["LS11UR"]);
    }

    #[test]
    fn test_fatal_row_aborts_fold() {
        let mut bad = site_row(5, "CPE-BR-002-YO17HH", "81.2.69.13/31", "192.0.2.16/29");
        bad.cells[Column::Vlan218.number() - 1] = Some("garbage".to_string());
        let rows = vec![
            site_row(4, "CPE-BR-001-LS11UR", "81.2.69.11/31", "192.0.2.8/29"),
            bad,
        ];
        let overrides = NextHopOverrides::builtin();
        let result = build_batch(&rows, &Normalizer::new(&overrides));
        assert!(
            matches!(result, Err(ImportError::MalformedSubnet { row: 5, .. })),
            "got {result:?}"
        );
    }
}

//! Persisted set of routes already reported (`dnac_routes.txt`).
//!
//! One CIDR per line. The file only ever grows: each run rewrites it with
//! the union of what it held and what the run found.

use crate::error::ImportError;
use crate::models::Ipv4;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct RouteLedger {
    path: PathBuf,
}

impl RouteLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RouteLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, message: String) -> ImportError {
        ImportError::Ledger {
            path: self.path.display().to_string(),
            message,
        }
    }

    /// Routes from earlier runs. A missing file is the first run: empty set.
    pub fn load(&self) -> Result<BTreeSet<Ipv4>, ImportError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!(
                    "Route ledger not found: {}, starting empty",
                    self.path.display()
                );
                return Ok(BTreeSet::new());
            }
            Err(e) => return Err(self.error(e.to_string())),
        };

        let mut routes = BTreeSet::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // A bad line must stop the run: rewriting without it would shrink the ledger.
            let route = Ipv4::new(line)
                .map_err(|e| self.error(format!("line {}: '{line}': {e}", i + 1)))?;
            routes.insert(route);
        }
        log::info!(
            "Read {} routes from ledger {}",
            routes.len(),
            self.path.display()
        );
        Ok(routes)
    }

    /// Overwrite the ledger with `routes`, one per line, sorted.
    pub fn store(&self, routes: &BTreeSet<Ipv4>) -> Result<(), ImportError> {
        let mut text = String::new();
        for route in routes {
            text.push_str(&route.to_string());
            text.push('\n');
        }
        std::fs::write(&self.path, text).map_err(|e| self.error(e.to_string()))?;
        log::info!(
            "Wrote {} routes to ledger {}",
            routes.len(),
            self.path.display()
        );
        Ok(())
    }
}

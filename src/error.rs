//! Error taxonomy for an import run.
//!
//! [`SkipReason`] is row-scoped and never stops the run. [`ImportError`] is
//! run-fatal: it aborts before the import table is written.

use thiserror::Error;

/// Why a tracker row was left out of the import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no circuit provisioned yet (WAN IP empty)")]
    NoCircuit,
    #[error("no serial number")]
    NoSerial,
    #[error("no device model")]
    NoModel,
    #[error("no loopback/system IP")]
    NoLoopback,
    #[error("unusable loopback '{0}'")]
    BadLoopback(String),
    #[error("unusable WAN IP '{0}'")]
    BadWanAddress(String),
    #[error("no public /29 to provision from")]
    NoPublicPrefix,
    #[error("unusable public /29 '{0}'")]
    BadPublicPrefix(String),
    #[error("no hostname")]
    NoHostname,
    #[error("hostname '{0}' does not look like <prefix>-<type>-<ref>-<postcode>")]
    BadHostname(String),
}

/// Failures that abort the whole run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("row {row}: malformed {column} network '{value}': {reason}")]
    MalformedSubnet {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("connection error reaching {url}: {source}")]
    PostcodeConnect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("postcode lookup {url} returned HTTP {status}: {body}")]
    PostcodeStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("postcode lookup did not return usable JSON at path '{path}': {message}")]
    PostcodeDecode { path: String, message: String },

    #[error("postcode lookup returned {received} results for {sent} postcodes")]
    PostcodeCountMismatch { sent: usize, received: usize },

    #[error("route lookup for public prefix {prefix} failed: {message}")]
    RouteLookup { prefix: String, message: String },

    #[error("route ledger {path}: {message}")]
    Ledger { path: String, message: String },

    #[error("tracker sheet: {0}")]
    Tracker(String),

    #[error("writing {path}: {message}")]
    Output { path: String, message: String },

    #[error("configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_subnet_names_row_and_value() {
        let err = ImportError::MalformedSubnet {
            row: 7,
            column: "VLAN10",
            value: "10.0.0.300/24".to_string(),
            reason: "Invalid address 10.0.0.300".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 7"), "{msg}");
        assert!(msg.contains("VLAN10"), "{msg}");
        assert!(msg.contains("10.0.0.300/24"), "{msg}");
    }

    #[test]
    fn test_route_lookup_names_prefix() {
        let err = ImportError::RouteLookup {
            prefix: "192.0.2.0/29".to_string(),
            message: "timed out".to_string(),
        };
        assert!(err.to_string().contains("192.0.2.0/29"));
    }
}

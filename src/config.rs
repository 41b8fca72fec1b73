//! Run configuration.
//!
//! Constants for the tracker layout and remote-lookup limits, plus [`Config`]
//! layered by figment: built-in defaults, then environment variables (a
//! `.env` file is loaded first by `main`).

use crate::error::ImportError;
use crate::models::NextHopOverrides;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Maximum postcodes per bulk request accepted by postcodes.io.
pub const POSTCODE_BATCH_LIMIT: usize = 100;
pub const DEFAULT_PUBLIC_PREFIX_LEN: u8 = 29;
pub const DEFAULT_LOOPBACK_PREFIX_LEN: u8 = 32;
pub const DEFAULT_WAN_PREFIX_LEN: u8 = 31;
/// Stand-in public block for MPLS circuits without one. Never looked up.
pub const MPLS_PLACEHOLDER_PREFIX: &str = "1.0.0.0/29";
/// Downstream rate forced for EoFTTP products, in Mbit/s.
pub const EOFTTP_DOWNSTREAM_MBPS: u64 = 200;
pub const EOFTTP_MARKER: &str = "EoFTTP";
pub const ROLE_SUFFIX: &str = "-R1";
pub const WAN_PARENT_INTERFACE: &str = "GigabitEthernet0/0/0";
pub const DEFAULT_ROUTE_PREFIX: &str = "0.0.0.0/0";

const DEFAULT_TRACKER_PATH: &str = "tracker.xlsx";
const DEFAULT_FIRST_ROW: usize = 4;
const DEFAULT_IMPORT_CSV: &str = "vmanage-import.csv";
const DEFAULT_ROUTE_LEDGER: &str = "dnac_routes.txt";
const DEFAULT_POSTCODE_API: &str = "https://api.postcodes.io/postcodes";
const DEFAULT_ROUTE_LOOKUP_API: &str = "https://stat.ripe.net/data/network-info/data.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub tracker_path: PathBuf,
    /// Worksheet name; first sheet when unset.
    pub tracker_sheet: Option<String>,
    /// 1-based first data row; rows above are the header region.
    pub first_row: usize,
    pub import_csv_path: PathBuf,
    pub route_ledger_path: PathBuf,
    pub postcode_api_url: String,
    pub route_lookup_url: String,
    pub http_timeout: Duration,
    pub next_hop_overrides: NextHopOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tracker_path: PathBuf::from(DEFAULT_TRACKER_PATH),
            tracker_sheet: None,
            first_row: DEFAULT_FIRST_ROW,
            import_csv_path: PathBuf::from(DEFAULT_IMPORT_CSV),
            route_ledger_path: PathBuf::from(DEFAULT_ROUTE_LEDGER),
            postcode_api_url: DEFAULT_POSTCODE_API.to_string(),
            route_lookup_url: DEFAULT_ROUTE_LOOKUP_API.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            next_hop_overrides: NextHopOverrides::builtin(),
        }
    }
}

/// Environment variables read into [`Settings`], lowercased by figment.
const ENV_KEYS: [&str; 9] = [
    "tracker_path",
    "tracker_sheet",
    "tracker_first_row",
    "import_csv_path",
    "route_ledger_path",
    "postcode_api_url",
    "route_lookup_url",
    "http_timeout_secs",
    "next_hop_overrides",
];

/// Flat, serde-facing shape of the configuration, one field per env var.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    tracker_path: PathBuf,
    tracker_sheet: Option<String>,
    tracker_first_row: usize,
    import_csv_path: PathBuf,
    route_ledger_path: PathBuf,
    postcode_api_url: String,
    route_lookup_url: String,
    http_timeout_secs: u64,
    next_hop_overrides: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tracker_path: PathBuf::from(DEFAULT_TRACKER_PATH),
            tracker_sheet: None,
            tracker_first_row: DEFAULT_FIRST_ROW,
            import_csv_path: PathBuf::from(DEFAULT_IMPORT_CSV),
            route_ledger_path: PathBuf::from(DEFAULT_ROUTE_LEDGER),
            postcode_api_url: DEFAULT_POSTCODE_API.to_string(),
            route_lookup_url: DEFAULT_ROUTE_LOOKUP_API.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            next_hop_overrides: None,
        }
    }
}

/// Blank text (`KEY=` in a `.env` file) means "use the default".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn path_or(value: PathBuf, default: &str) -> PathBuf {
    if value.as_os_str().to_string_lossy().trim().is_empty() {
        PathBuf::from(default)
    } else {
        value
    }
}

fn text_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl Config {
    /// Defaults merged with the process environment.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Env::raw().only(&ENV_KEYS))
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Config, ImportError> {
        Config::from_figment(Config::figment())
    }

    /// Extract and validate a [`Config`] from any figment.
    pub fn from_figment(figment: Figment) -> Result<Config, ImportError> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| ImportError::Config(e.to_string()))?;

        if settings.tracker_first_row < 1 {
            return Err(ImportError::Config(format!(
                "TRACKER_FIRST_ROW must be a row number >= 1, got {}",
                settings.tracker_first_row
            )));
        }

        let mut next_hop_overrides = NextHopOverrides::builtin();
        if let Some(spec) = non_blank(settings.next_hop_overrides) {
            next_hop_overrides
                .merge_spec(&spec)
                .map_err(|e| ImportError::Config(format!("NEXT_HOP_OVERRIDES: {e}")))?;
        }

        let config = Config {
            tracker_path: path_or(settings.tracker_path, DEFAULT_TRACKER_PATH),
            tracker_sheet: non_blank(settings.tracker_sheet),
            first_row: settings.tracker_first_row,
            import_csv_path: path_or(settings.import_csv_path, DEFAULT_IMPORT_CSV),
            route_ledger_path: path_or(settings.route_ledger_path, DEFAULT_ROUTE_LEDGER),
            postcode_api_url: text_or(settings.postcode_api_url, DEFAULT_POSTCODE_API),
            route_lookup_url: text_or(settings.route_lookup_url, DEFAULT_ROUTE_LOOKUP_API),
            http_timeout: Duration::from_secs(settings.http_timeout_secs),
            next_hop_overrides,
        };
        log::debug!("config: {config:?}");
        Ok(config)
    }
}

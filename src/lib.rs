// SD-WAN bulk import: tracker sheet -> vManage import CSV + public route report.
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod output;
pub mod processing;
pub mod routes;
pub mod tracker;

use colored::Colorize;
use std::error::Error;

pub use config::Config;
pub use error::{ImportError, SkipReason};
pub use geo::{resolve, unresolved_hostnames, PostcodeLookup, PostcodesIoClient};
pub use models::{DeviceRecord, GeoResult, Ipv4};
pub use processing::{build_batch, ImportBatch, Normalizer, SkippedRow};
pub use routes::{aggregate, RipeStatClient, RouteLedger, RouteLookup, RouteReport};
pub use tracker::{open_tracker, read_tracker, Row, TabularSource};

/// What a finished run produced, for the caller's report and for tests.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub accepted: usize,
    pub skipped: Vec<SkippedRow>,
    /// Hostnames whose postcode did not resolve.
    pub unresolved: Vec<String>,
    /// `None` when the import CSV was not written.
    pub rows_written: Option<usize>,
    pub routes: RouteReport,
}

/// Full run against the live lookup services named in `config`.
pub async fn run(config: &Config) -> Result<RunSummary, Box<dyn Error>> {
    log::info!("#Start run() tracker={}", config.tracker_path.display());
    let mut source = open_tracker(config)?;
    let postcodes = PostcodesIoClient::new(&config.postcode_api_url, config.http_timeout)?;
    let route_lookup = RipeStatClient::new(&config.route_lookup_url, config.http_timeout)?;
    let summary = run_with(config, source.as_mut(), &postcodes, &route_lookup).await?;
    Ok(summary)
}

/// The pipeline with its collaborators injected.
///
/// Row normalisation must succeed for anything to be written. After that the
/// import CSV and the route ledger are independent: a geolocation failure
/// leaves no CSV behind but route aggregation still runs, and the geolocation
/// error is returned once the route phase is done.
pub async fn run_with<P, R>(
    config: &Config,
    source: &mut dyn TabularSource,
    postcodes: &P,
    route_lookup: &R,
) -> Result<RunSummary, ImportError>
where
    P: PostcodeLookup,
    R: RouteLookup,
{
    let rows = read_tracker(source)?;
    let normalizer = Normalizer::new(&config.next_hop_overrides);
    let batch = build_batch(&rows, &normalizer)?;
    println!(
        "{} accepted, {} skipped",
        batch.records.len().to_string().green(),
        batch.skipped.len().to_string().yellow()
    );
    output::print_skipped(&batch.skipped);

    let mut summary = RunSummary {
        accepted: batch.records.len(),
        skipped: batch.skipped.clone(),
        ..RunSummary::default()
    };

    let geo_outcome = write_import(config, &batch, postcodes).await;
    match &geo_outcome {
        Ok((written, unresolved)) => {
            summary.rows_written = Some(*written);
            summary.unresolved = unresolved.clone();
        }
        Err(e) => log::error!("import CSV not written: {e}"),
    }

    let ledger = RouteLedger::new(&config.route_ledger_path);
    summary.routes = aggregate(route_lookup, &batch.public_prefixes(), &ledger).await?;
    output::print_route_report(&summary.routes);

    geo_outcome?;
    Ok(summary)
}

/// Geolocate, write the CSV, then flag rows left without coordinates.
async fn write_import<P: PostcodeLookup>(
    config: &Config,
    batch: &ImportBatch,
    postcodes: &P,
) -> Result<(usize, Vec<String>), ImportError> {
    let geo = resolve(postcodes, &batch.postcodes()).await?;
    let table = output::build_table(&batch.records, &geo);
    output::write_import_csv(&config.import_csv_path, &table)?;
    println!(
        "Wrote {} devices to {}",
        table.rows.len(),
        config.import_csv_path.display()
    );

    let unresolved = unresolved_hostnames(&batch.records, &geo);
    for hostname in &unresolved {
        log::warn!("{hostname}: postcode did not resolve, coordinates left empty");
    }
    output::print_unresolved(&unresolved);
    Ok((
        table.rows.len(),
        unresolved.into_iter().map(str::to_string).collect(),
    ))
}

//! Postcode geolocation.
//!
//! - [`PostcodeLookup`] - one bulk request to a postcode service
//! - [`PostcodesIoClient`] - postcodes.io implementation
//! - [`resolve`] - chunked lookups reassembled in input order

mod postcodes_io;

use crate::config::POSTCODE_BATCH_LIMIT;
use crate::error::ImportError;
use crate::models::{DeviceRecord, GeoResult};

pub use postcodes_io::PostcodesIoClient;

/// A bulk postcode lookup returning one result per postcode, in order.
#[allow(async_fn_in_trait)]
pub trait PostcodeLookup {
    async fn lookup(&self, postcodes: &[String]) -> Result<Vec<GeoResult>, ImportError>;
}

/// Look up every postcode in chunks of at most [`POSTCODE_BATCH_LIMIT`],
/// one request at a time. Any failure aborts the whole resolution.
pub async fn resolve<L: PostcodeLookup>(
    lookup: &L,
    postcodes: &[String],
) -> Result<Vec<GeoResult>, ImportError> {
    let mut results = Vec::with_capacity(postcodes.len());
    for (i, chunk) in postcodes.chunks(POSTCODE_BATCH_LIMIT).enumerate() {
        log::info!("postcode batch #{i}: {} postcodes", chunk.len());
        let batch = lookup.lookup(chunk).await?;
        if batch.len() != chunk.len() {
            return Err(ImportError::PostcodeCountMismatch {
                sent: chunk.len(),
                received: batch.len(),
            });
        }
        for (sent, got) in chunk.iter().zip(&batch) {
            if !sent.eq_ignore_ascii_case(&got.postcode) {
                log::warn!("postcode lookup answered '{}' for '{sent}'", got.postcode);
            }
        }
        results.extend(batch);
    }
    Ok(results)
}

/// Hostnames whose postcode did not resolve, for the operator to fix.
pub fn unresolved_hostnames<'a>(records: &'a [DeviceRecord], geo: &[GeoResult]) -> Vec<&'a str> {
    records
        .iter()
        .zip(geo)
        .filter(|(_, g)| !g.is_resolved())
        .map(|(r, _)| r.hostname.as_str())
        .collect()
}

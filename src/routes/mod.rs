//! Public route aggregation for the second controller.
//!
//! - [`RouteLookup`] - which announced block owns a public prefix
//! - [`RipeStatClient`] - RIPEstat implementation
//! - [`RouteLedger`] - routes reported by earlier runs
//! - [`aggregate`] - lookup, dedup, diff against the ledger, persist

mod ledger;
mod ripestat;

use crate::config::MPLS_PLACEHOLDER_PREFIX;
use crate::error::ImportError;
use crate::models::Ipv4;
use std::collections::BTreeSet;

pub use ledger::RouteLedger;
pub use ripestat::RipeStatClient;

/// Resolve a public prefix to the announced network block that contains it.
#[allow(async_fn_in_trait)]
pub trait RouteLookup {
    async fn owning_block(&self, prefix: &Ipv4) -> Result<Ipv4, ImportError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteReport {
    /// Blocks found this run that no earlier run reported.
    pub new_routes: BTreeSet<Ipv4>,
    /// Everything ever reported, as now persisted.
    pub full_routes: BTreeSet<Ipv4>,
}

/// `(current - known, current ∪ known)`.
pub fn diff_routes(
    current: &BTreeSet<Ipv4>,
    known: &BTreeSet<Ipv4>,
) -> (BTreeSet<Ipv4>, BTreeSet<Ipv4>) {
    let new_routes = current.difference(known).copied().collect();
    let full_routes = current.union(known).copied().collect();
    (new_routes, full_routes)
}

/// Look up the owning block of each distinct prefix, in order, failing on
/// the first lookup error. The MPLS placeholder is skipped.
pub async fn owning_blocks<L: RouteLookup>(
    lookup: &L,
    prefixes: &[Ipv4],
) -> Result<BTreeSet<Ipv4>, ImportError> {
    let placeholder = Ipv4::new(MPLS_PLACEHOLDER_PREFIX).ok();
    let distinct: BTreeSet<Ipv4> = prefixes.iter().copied().collect();

    let mut blocks = BTreeSet::new();
    for prefix in distinct {
        if Some(prefix) == placeholder {
            log::debug!("{prefix} is the MPLS placeholder, not looked up");
            continue;
        }
        let block = lookup.owning_block(&prefix).await?;
        log::info!("public prefix {prefix} is announced in {block}");
        blocks.insert(block);
    }
    Ok(blocks)
}

/// Resolve, diff against the ledger and rewrite it with the union.
pub async fn aggregate<L: RouteLookup>(
    lookup: &L,
    prefixes: &[Ipv4],
    ledger: &RouteLedger,
) -> Result<RouteReport, ImportError> {
    let current = owning_blocks(lookup, prefixes).await?;
    let known = ledger.load()?;
    let (new_routes, full_routes) = diff_routes(&current, &known);
    ledger.store(&full_routes)?;
    Ok(RouteReport {
        new_routes,
        full_routes,
    })
}

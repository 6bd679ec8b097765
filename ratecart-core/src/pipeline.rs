//! Pipeline composition: ingest → read back → fetch catalog → convert → rank.
//!
//! The core returns the ranked rows as a value; printing and exporting are
//! the caller's concern.

use crate::config::EtlConfig;
use crate::convert::convert;
use crate::error::EtlError;
use crate::ingest::{ingest_rates, IngestSummary};
use crate::provider::{CatalogSource, RateSource};
use crate::rank::top_n;
use crate::records::RankedRow;
use crate::store::RateStore;

/// Outcome of a full pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    pub ingest: IngestSummary,
    pub top_products: Vec<RankedRow>,
}

/// Run the full ETL.
///
/// Per-currency ingestion failures are tolerated and reported through the
/// summary; a catalog fetch failure, a missing partition root, or an invalid
/// config is fatal and aborts the run with no partial product results.
pub fn run_pipeline(
    rate_source: &dyn RateSource,
    catalog_source: &dyn CatalogSource,
    store: &RateStore,
    config: &EtlConfig,
) -> Result<PipelineResult, EtlError> {
    config.validate()?;

    let ingest = ingest_rates(rate_source, store, config);
    let rates = store.read_all()?;
    let products = catalog_source.fetch()?;

    let joined = convert(&products, &rates, &config.dates, &config.price_currency);
    let top_products = top_n(&joined, config.top_n);

    log::info!(
        "pipeline produced {} top products from {} products and {} rate rows",
        top_products.len(),
        products.len(),
        rates.len()
    );

    Ok(PipelineResult {
        ingest,
        top_products,
    })
}

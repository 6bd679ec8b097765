//! Provider traits and structured error types.
//!
//! `RateSource` and `CatalogSource` abstract over the two upstream HTTP
//! services so the pipeline can be exercised against fakes in tests. The
//! HTTP adapters live in [`crate::frankfurter`] and [`crate::fakestore`];
//! providers know nothing about the partition store.

use crate::records::{ProductRecord, RateRecord};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors from an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },
}

/// Source of daily exchange rates.
///
/// One request per (date, from, to) triple; implementations do not batch
/// across currencies and do not retry.
pub trait RateSource {
    fn fetch(
        &self,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<RateRecord, ProviderError>;
}

/// Source of the product catalog.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<ProductRecord>, ProviderError>;
}

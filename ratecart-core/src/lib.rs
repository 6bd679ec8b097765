//! RateCart Core — batch ETL for currency rates and product rankings.
//!
//! The pipeline has five stages, each an immutable-in/immutable-out value
//! transform composed by [`pipeline::run_pipeline`]:
//!
//! - Rate ingestion: fetch daily exchange rates per (date, currency) and
//!   persist them as date-partitioned CSV files, tolerating per-currency
//!   failure ([`frankfurter`], [`ingest`], [`store`])
//! - Partition read-back: load every partition file into one table
//!   ([`store`])
//! - Catalog fetch: products with flattened rating columns ([`fakestore`])
//! - Price conversion: cross join products × same-day USD rates
//!   ([`convert`])
//! - Top-N: competition ranking per date partition ([`rank`])
//!
//! Everything runs single-threaded and sequentially; the only shared
//! resource is the partition directory tree.

pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod fakestore;
pub mod frankfurter;
pub mod ingest;
pub mod pipeline;
pub mod provider;
pub mod rank;
pub mod records;
pub mod store;

pub use config::{ConfigError, EtlConfig};
pub use convert::convert;
pub use error::EtlError;
pub use export::write_results;
pub use fakestore::FakeStoreClient;
pub use frankfurter::FrankfurterClient;
pub use ingest::{ingest_rates, IngestFailure, IngestSummary};
pub use pipeline::{run_pipeline, PipelineResult};
pub use provider::{CatalogSource, ProviderError, RateSource};
pub use rank::top_n;
pub use records::{JoinedRow, ProductRecord, RankedRow, RateRecord, StoredRate};
pub use store::{PartitionStatus, RateStore, StoreError};

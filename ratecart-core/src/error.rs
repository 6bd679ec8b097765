//! Umbrella error for the pipeline.
//!
//! Per-currency provider/store failures during ingestion are caught and
//! logged by the ingest loop; everything that reaches a caller through this
//! type is fatal and aborts the run.

use crate::config::ConfigError;
use crate::provider::ProviderError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

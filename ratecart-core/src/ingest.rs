//! Ingestion orchestrator — fetches and persists rate partitions.
//!
//! One partition per requested date, one fetch per source currency. Failure
//! is isolated per currency: a failed fetch or write is logged, recorded in
//! the summary, and never aborts the partition or the date loop. No retries.

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::provider::RateSource;
use crate::store::RateStore;
use chrono::NaiveDate;

/// One skipped (date, currency) pair and the error that caused it.
#[derive(Debug)]
pub struct IngestFailure {
    pub date: NaiveDate,
    pub currency: String,
    pub error: EtlError,
}

/// Summary of an ingestion run.
#[derive(Debug)]
pub struct IngestSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record_failure(&mut self, date: NaiveDate, currency: &str, error: EtlError) {
        self.failed += 1;
        self.failures.push(IngestFailure {
            date,
            currency: currency.to_string(),
            error,
        });
    }
}

/// Fetch rates for every (date, source currency) pair and persist them as
/// date partitions.
///
/// Each date's partition directory is destructively replaced before writes,
/// so currencies that succeeded on a prior run but fail now disappear from
/// the partition.
pub fn ingest_rates(
    source: &dyn RateSource,
    store: &RateStore,
    config: &EtlConfig,
) -> IngestSummary {
    let from_currencies = config.from_currencies();
    let mut summary = IngestSummary {
        attempted: config.dates.len() * from_currencies.len(),
        succeeded: 0,
        failed: 0,
        failures: Vec::new(),
    };

    for &date in &config.dates {
        let dir = match store.replace_partition(date) {
            Ok(dir) => dir,
            Err(e) => {
                // The whole date is lost, but later dates still run.
                log::error!("failed to prepare partition for {date}: {e}");
                let reason = e.to_string();
                for currency in &from_currencies {
                    summary.record_failure(
                        date,
                        currency,
                        EtlError::Store(crate::store::StoreError::Io {
                            path: store.root().to_path_buf(),
                            source: std::io::Error::other(reason.clone()),
                        }),
                    );
                }
                continue;
            }
        };

        for currency in &from_currencies {
            match source.fetch(date, currency, &config.target_currency) {
                Ok(record) => match store.write_record(&dir, &record) {
                    Ok(_) => summary.succeeded += 1,
                    Err(e) => {
                        log::error!("{e}");
                        summary.record_failure(date, currency, e.into());
                    }
                },
                Err(e) => {
                    log::error!("{e}");
                    summary.record_failure(date, currency, e.into());
                }
            }
        }
    }

    summary
}

//! Date-partitioned rate store.
//!
//! Layout: `{rates_root}/{date}/{from}_{to}_{date}.csv` — Hive-style
//! single-level date partitioning, one record per file.
//!
//! Writing a partition is a destructive overwrite: any prior contents of the
//! date directory are discarded first, so a rerun yields a partition holding
//! only the currencies that succeeded on the latest run. A crash between
//! delete and repopulation leaves the partition incomplete; rerunning the
//! ingestion for that date is the recovery path.

use crate::records::{RateRecord, StoredRate};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the partition store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("partition root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error at {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Record count for one on-disk partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStatus {
    pub date: NaiveDate,
    pub record_count: usize,
}

/// The date-partitioned rate store.
pub struct RateStore {
    root: PathBuf,
}

impl RateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one date partition: `{root}/{date}`.
    fn partition_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.to_string())
    }

    /// Delete and recreate the partition directory for a date.
    ///
    /// Returns the fresh, empty directory. This is the destructive half of
    /// the overwrite contract; callers repopulate it record by record.
    pub fn replace_partition(&self, date: NaiveDate) -> Result<PathBuf, StoreError> {
        let dir = self.partition_dir(date);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(dir)
    }

    /// Write one rate record into a partition directory as
    /// `{from}_{to}_{date}.csv`, stamping `updated_at` with the processing
    /// time. Returns the file path.
    pub fn write_record(&self, dir: &Path, record: &RateRecord) -> Result<PathBuf, StoreError> {
        let stored = StoredRate::from_record(record, chrono::Local::now().naive_local());
        let path = dir.join(format!(
            "{}_{}_{}.csv",
            stored.from_currency, stored.to_currency, stored.date
        ));

        let mut writer = csv::Writer::from_path(&path).map_err(|e| StoreError::csv(&path, e))?;
        writer.serialize(&stored).map_err(|e| StoreError::csv(&path, e))?;
        writer
            .flush()
            .map_err(|e| StoreError::io(&path, e))?;

        log::info!(
            "stored exchange rates for {} to {} on {} in {}",
            stored.from_currency,
            stored.to_currency,
            stored.date,
            path.display()
        );
        Ok(path)
    }

    /// Load every record under the root into one table.
    ///
    /// Walks the tree recursively and concatenates file row-sets in
    /// enumeration order. Enumeration order is platform-dependent and not a
    /// correctness dependency; downstream stages filter and re-sort.
    ///
    /// A missing root is an error; an existing but empty root yields an
    /// empty table.
    pub fn read_all(&self) -> Result<Vec<StoredRate>, StoreError> {
        if !self.root.exists() {
            return Err(StoreError::MissingRoot(self.root.clone()));
        }

        let mut rows = Vec::new();
        read_dir_recursive(&self.root, &mut rows)?;
        Ok(rows)
    }

    /// List on-disk partitions with their record counts, sorted by date.
    ///
    /// Directories whose names do not parse as ISO dates are skipped.
    pub fn status(&self) -> Result<Vec<PartitionStatus>, StoreError> {
        if !self.root.exists() {
            return Err(StoreError::MissingRoot(self.root.clone()));
        }

        let mut statuses = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Ok(date) = NaiveDate::parse_from_str(&name, "%Y-%m-%d") else {
                continue;
            };

            let path = entry.path();
            let files = fs::read_dir(&path).map_err(|e| StoreError::io(&path, e))?;
            let record_count = files
                .filter_map(Result::ok)
                .filter(|f| f.path().is_file())
                .count();

            statuses.push(PartitionStatus { date, record_count });
        }

        statuses.sort_by_key(|s| s.date);
        Ok(statuses)
    }
}

fn read_dir_recursive(dir: &Path, rows: &mut Vec<StoredRate>) -> Result<(), StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            read_dir_recursive(&path, rows)?;
        } else {
            read_partition_file(&path, rows)?;
        }
    }
    Ok(())
}

fn read_partition_file(path: &Path, rows: &mut Vec<StoredRate>) -> Result<(), StoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    for result in reader.deserialize::<StoredRate>() {
        rows.push(result.map_err(|e| StoreError::csv(path, e))?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_root() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("ratecart_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_record(from: &str, date: NaiveDate, rate: f64) -> RateRecord {
        RateRecord {
            date,
            from_currency: from.to_string(),
            to_currency: "EUR".to_string(),
            amount: 1.0,
            exchange_rate: rate,
            fetched_at: chrono::Local::now().naive_local(),
        }
    }

    fn feb(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    #[test]
    fn write_and_read_roundtrip() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let dir = store.replace_partition(feb(12)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(12), 0.93)).unwrap();
        store.write_record(&dir, &sample_record("GBP", feb(12), 1.17)).unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.to_currency, "EUR");
            assert_ne!(row.from_currency, row.to_currency);
            assert_eq!(row.date, feb(12));
        }

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn record_file_uses_from_to_date_naming() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let dir = store.replace_partition(feb(12)).unwrap();
        let path = store
            .write_record(&dir, &sample_record("USD", feb(12), 0.93))
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "USD_EUR_2024-02-12.csv"
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn replace_partition_discards_prior_contents() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let dir = store.replace_partition(feb(12)).unwrap();
        store.write_record(&dir, &sample_record("GBP", feb(12), 1.17)).unwrap();

        // Rerun with a catalog that no longer carries GBP
        let dir = store.replace_partition(feb(12)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(12), 0.93)).unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].from_currency, "USD");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn read_all_spans_multiple_partitions() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let dir = store.replace_partition(feb(12)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(12), 0.93)).unwrap();
        let dir = store.replace_partition(feb(13)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(13), 0.9322)).unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 2);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = temp_root();
        let _ = fs::remove_dir_all(&root);
        let store = RateStore::new(&root);

        match store.read_all() {
            Err(StoreError::MissingRoot(path)) => assert_eq!(path, root),
            other => panic!("expected MissingRoot, got {other:?}"),
        }
    }

    #[test]
    fn empty_root_yields_empty_table() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let rows = store.read_all().unwrap();
        assert!(rows.is_empty());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn status_reports_counts_per_date() {
        let root = temp_root();
        let store = RateStore::new(&root);

        let dir = store.replace_partition(feb(13)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(13), 0.9322)).unwrap();
        store.write_record(&dir, &sample_record("GBP", feb(13), 1.17)).unwrap();
        let dir = store.replace_partition(feb(12)).unwrap();
        store.write_record(&dir, &sample_record("USD", feb(12), 0.93)).unwrap();

        let statuses = store.status().unwrap();
        assert_eq!(
            statuses,
            vec![
                PartitionStatus { date: feb(12), record_count: 1 },
                PartitionStatus { date: feb(13), record_count: 2 },
            ]
        );

        let _ = fs::remove_dir_all(&root);
    }
}

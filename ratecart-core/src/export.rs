//! Final result export.
//!
//! Writes the ranked rows as a CSV table matching the downstream warehouse
//! schema: `id, title, price_usd, description, category, image, rating_rate,
//! rating_count, exchange_rate_date, exchange_rate, price_eur`. The rank is
//! an internal cutoff criterion and is not exported.

use crate::records::RankedRow;
use crate::store::StoreError;
use std::path::Path;

/// Write ranked rows to a CSV file at `path`.
pub fn write_results(rows: &[RankedRow], path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    for ranked in rows {
        writer.serialize(&ranked.row).map_err(|e| StoreError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    writer.flush().map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::info!("wrote {} result rows to {}", rows.len(), path.display());
    Ok(())
}

//! Price conversion: cross join products with filtered rate rows.

use crate::records::{JoinedRow, ProductRecord, StoredRate};
use chrono::NaiveDate;

/// Pair every product with every surviving rate row and compute the
/// converted price.
///
/// Rates are first filtered to the requested dates and to rows whose
/// `from_currency` matches `price_currency` (the currency catalog prices are
/// denominated in). The result is a full cross join — one row per product
/// per surviving rate row, cardinality `|products| × |surviving rates|` —
/// which is what enables per-date ranking downstream. Output is grouped by
/// rate row, preserving the products' original relative order within each
/// group.
pub fn convert(
    products: &[ProductRecord],
    rates: &[StoredRate],
    requested_dates: &[NaiveDate],
    price_currency: &str,
) -> Vec<JoinedRow> {
    let surviving: Vec<&StoredRate> = rates
        .iter()
        .filter(|r| r.from_currency == price_currency && requested_dates.contains(&r.date))
        .collect();

    let mut joined = Vec::with_capacity(products.len() * surviving.len());
    for rate in &surviving {
        for product in products {
            joined.push(JoinedRow::new(product, rate));
        }
    }
    joined
}

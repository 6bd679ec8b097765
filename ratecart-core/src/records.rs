//! Domain records flowing through the pipeline.
//!
//! Every stage consumes an immutable input and produces a new value; nothing
//! here is mutated after construction.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A normalized exchange rate for one (date, from, to) triple, as returned
/// by a rate provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub date: NaiveDate,
    pub from_currency: String,
    pub to_currency: String,
    /// Base amount the provider quoted the rate against (usually 1.0).
    pub amount: f64,
    pub exchange_rate: f64,
    pub fetched_at: NaiveDateTime,
}

/// On-disk row shape for one partition file.
///
/// Field order is the CSV column order: `date, from_currency, amount,
/// to_currency, exchange_rate, updated_at`. `updated_at` is the processing
/// timestamp stamped at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRate {
    pub date: NaiveDate,
    pub from_currency: String,
    pub amount: f64,
    pub to_currency: String,
    pub exchange_rate: f64,
    pub updated_at: NaiveDateTime,
}

impl StoredRate {
    pub fn from_record(record: &RateRecord, updated_at: NaiveDateTime) -> Self {
        Self {
            date: record.date,
            from_currency: record.from_currency.clone(),
            amount: record.amount,
            to_currency: record.to_currency.clone(),
            exchange_rate: record.exchange_rate,
            updated_at,
        }
    }
}

/// A catalog product with the provider's nested `rating` object flattened
/// into `rating_rate` / `rating_count` and `price` renamed to `price_usd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub title: String,
    pub price_usd: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating_rate: f64,
    pub rating_count: u64,
}

/// One product paired with one same-day rate row, plus the converted price.
///
/// Field order matches the downstream warehouse column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub id: i64,
    pub title: String,
    pub price_usd: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating_rate: f64,
    pub rating_count: u64,
    pub exchange_rate_date: NaiveDate,
    pub exchange_rate: f64,
    pub price_eur: f64,
}

impl JoinedRow {
    pub fn new(product: &ProductRecord, rate: &StoredRate) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price_usd: product.price_usd,
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            rating_rate: product.rating_rate,
            rating_count: product.rating_count,
            exchange_rate_date: rate.date,
            exchange_rate: rate.exchange_rate,
            price_eur: product.price_usd * rate.exchange_rate,
        }
    }
}

/// A joined row that survived the per-date top-N cut, with its competition
/// rank (1-based within its date partition).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: u32,
    pub row: JoinedRow,
}

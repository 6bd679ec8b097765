//! Fake Store product catalog provider.
//!
//! Fetches a category endpoint returning a JSON array of products with a
//! nested `rating` object, and flattens each into a [`ProductRecord`]
//! (`rating.rate` → `rating_rate`, `rating.count` → `rating_count`,
//! `price` → `price_usd`).

use crate::provider::{CatalogSource, ProviderError};
use crate::records::ProductRecord;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: i64,
    title: String,
    price: f64,
    description: String,
    category: String,
    image: String,
    rating: RawRating,
}

#[derive(Debug, Deserialize)]
struct RawRating {
    rate: f64,
    count: u64,
}

impl RawProduct {
    fn flatten(self) -> ProductRecord {
        ProductRecord {
            id: self.id,
            title: self.title,
            price_usd: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating_rate: self.rating.rate,
            rating_count: self.rating.count,
        }
    }
}

/// HTTP client for the Fake Store catalog API.
pub struct FakeStoreClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl FakeStoreClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ratecart/0.1.0")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn parse_payload(url: &str, body: &str) -> Result<Vec<ProductRecord>, ProviderError> {
        let raw: Vec<RawProduct> =
            serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(raw.into_iter().map(RawProduct::flatten).collect())
    }
}

impl Default for FakeStoreClient {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CATALOG_ENDPOINT)
    }
}

impl CatalogSource for FakeStoreClient {
    fn fetch(&self) -> Result<Vec<ProductRecord>, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| ProviderError::Network {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        log::info!(
            "requested url: {} with HTTP status code {}",
            self.endpoint,
            status.as_u16()
        );

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().map_err(|e| ProviderError::Network {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        Self::parse_payload(&self.endpoint, &body)
    }
}

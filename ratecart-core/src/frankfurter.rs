//! Frankfurter exchange rate provider.
//!
//! Fetches one rate per request from the Frankfurter API:
//! `GET <root>/<date>?from=<CODE>&to=<CODE>` returning
//! `{"amount": 1.0, "base": "USD", "date": "2024-02-12", "rates": {"EUR": 0.93}}`.
//! No retries; a failed currency is simply absent from its partition.

use crate::provider::{ProviderError, RateSource};
use crate::records::RateRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Frankfurter API response.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    amount: f64,
    base: String,
    date: NaiveDate,
    rates: BTreeMap<String, f64>,
}

/// HTTP client for the Frankfurter API.
pub struct FrankfurterClient {
    client: reqwest::blocking::Client,
    api_root: String,
}

impl FrankfurterClient {
    /// Build a client against the given API root (trailing slash expected).
    pub fn new(api_root: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ratecart/0.1.0")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_root: api_root.into(),
        }
    }

    fn rate_url(&self, date: NaiveDate, from: &str, to: &str) -> String {
        format!("{}{date}?from={from}&to={to}", self.api_root)
    }

    /// Normalize a response body into a `RateRecord`.
    ///
    /// The response `date` wins over the requested date (the API resolves
    /// weekends and holidays to the previous trading day).
    fn parse_payload(url: &str, body: &str) -> Result<RateRecord, ProviderError> {
        let payload: RatesPayload =
            serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let (to_currency, exchange_rate) =
            payload
                .rates
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Malformed {
                    url: url.to_string(),
                    reason: "empty 'rates' object".to_string(),
                })?;

        Ok(RateRecord {
            date: payload.date,
            from_currency: payload.base,
            to_currency,
            amount: payload.amount,
            exchange_rate,
            fetched_at: chrono::Local::now().naive_local(),
        })
    }
}

impl Default for FrankfurterClient {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RATES_API_ROOT)
    }
}

impl RateSource for FrankfurterClient {
    fn fetch(
        &self,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<RateRecord, ProviderError> {
        let url = self.rate_url(date, from_currency, to_currency);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ProviderError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        log::info!("requested url: {url} with HTTP status code {}", status.as_u16());

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().map_err(|e| ProviderError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Self::parse_payload(&url, &body)
    }
}

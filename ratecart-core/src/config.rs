//! Run configuration.
//!
//! The currency catalog and target currency are explicit values passed into
//! each stage, not process-wide constants, so runs with different catalogs
//! can coexist. A config can be built from defaults, assembled in code, or
//! loaded from a TOML file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default exchange rate API root (Frankfurter).
pub const DEFAULT_RATES_API_ROOT: &str = "https://api.frankfurter.app/";

/// Default product catalog endpoint (Fake Store, women's clothing category).
pub const DEFAULT_CATALOG_ENDPOINT: &str =
    "https://fakestoreapi.com/products/category/women%27s%20clothing";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid currency code '{0}' (expected 3 uppercase ASCII letters)")]
    InvalidCurrency(String),

    #[error("date list is empty — at least one ingestion date is required")]
    EmptyDates,

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Serializable configuration for one ETL run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EtlConfig {
    /// Currency every source rate is quoted against.
    #[serde(default = "default_target_currency")]
    pub target_currency: String,

    /// Currency the catalog prices are denominated in; only rate rows with
    /// this `from_currency` take part in the join.
    #[serde(default = "default_price_currency")]
    pub price_currency: String,

    /// Source currency catalog: code to display name.
    #[serde(default = "default_catalog")]
    pub currencies: BTreeMap<String, String>,

    /// Dates to ingest and join on.
    #[serde(default)]
    pub dates: Vec<NaiveDate>,

    /// Per-date cutoff for the final ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Root directory for the date-partitioned rate files.
    #[serde(default = "default_rates_root")]
    pub rates_root: PathBuf,

    /// Exchange rate API root URL.
    #[serde(default = "default_rates_api_root")]
    pub rates_api_root: String,

    /// Product catalog endpoint URL.
    #[serde(default = "default_catalog_endpoint")]
    pub catalog_endpoint: String,
}

fn default_target_currency() -> String {
    String::from("EUR")
}

fn default_price_currency() -> String {
    String::from("USD")
}

fn default_top_n() -> usize {
    5
}

fn default_rates_root() -> PathBuf {
    PathBuf::from("data/exchange_rates")
}

fn default_rates_api_root() -> String {
    String::from(DEFAULT_RATES_API_ROOT)
}

fn default_catalog_endpoint() -> String {
    String::from(DEFAULT_CATALOG_ENDPOINT)
}

fn default_catalog() -> BTreeMap<String, String> {
    [
        ("AUD", "Australian Dollar"),
        ("BGN", "Bulgarian Lev"),
        ("BRL", "Brazilian Real"),
        ("CAD", "Canadian Dollar"),
        ("CHF", "Swiss Franc"),
        ("CNY", "Chinese Renminbi Yuan"),
        ("CZK", "Czech Koruna"),
        ("DKK", "Danish Krone"),
        ("EUR", "Euro"),
        ("GBP", "British Pound"),
        ("HKD", "Hong Kong Dollar"),
        ("HUF", "Hungarian Forint"),
        ("IDR", "Indonesian Rupiah"),
        ("ILS", "Israeli New Sheqel"),
        ("INR", "Indian Rupee"),
        ("ISK", "Icelandic Króna"),
        ("JPY", "Japanese Yen"),
        ("KRW", "South Korean Won"),
        ("MXN", "Mexican Peso"),
        ("MYR", "Malaysian Ringgit"),
        ("NOK", "Norwegian Krone"),
        ("NZD", "New Zealand Dollar"),
        ("PHP", "Philippine Peso"),
        ("PLN", "Polish Złoty"),
        ("RON", "Romanian Leu"),
        ("SEK", "Swedish Krona"),
        ("SGD", "Singapore Dollar"),
        ("THB", "Thai Baht"),
        ("TRY", "Turkish Lira"),
        ("USD", "United States Dollar"),
        ("ZAR", "South African Rand"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            target_currency: default_target_currency(),
            price_currency: default_price_currency(),
            currencies: default_catalog(),
            dates: Vec::new(),
            top_n: default_top_n(),
            rates_root: default_rates_root(),
            rates_api_root: default_rates_api_root(),
            catalog_endpoint: default_catalog_endpoint(),
        }
    }
}

impl EtlConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Source currencies to fetch: the catalog minus the target currency,
    /// in sorted order. The target cannot be converted to itself.
    pub fn from_currencies(&self) -> Vec<&str> {
        self.currencies
            .keys()
            .map(String::as_str)
            .filter(|code| *code != self.target_currency)
            .collect()
    }

    /// Validate currency codes and the date list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for code in self
            .currencies
            .keys()
            .map(String::as_str)
            .chain([self.target_currency.as_str(), self.price_currency.as_str()])
        {
            if !is_valid_code(code) {
                return Err(ConfigError::InvalidCurrency(code.to_string()));
            }
        }
        if self.dates.is_empty() {
            return Err(ConfigError::EmptyDates);
        }
        Ok(())
    }
}

fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_dates() -> EtlConfig {
        EtlConfig {
            dates: vec![NaiveDate::from_ymd_opt(2024, 2, 12).unwrap()],
            ..EtlConfig::default()
        }
    }

    #[test]
    fn default_catalog_excludes_target_from_sources() {
        let config = with_dates();
        let sources = config.from_currencies();

        assert_eq!(config.currencies.len(), 31);
        assert_eq!(sources.len(), 30);
        assert!(!sources.contains(&"EUR"));
        assert!(sources.contains(&"USD"));
        assert!(sources.contains(&"GBP"));
    }

    #[test]
    fn from_currencies_is_sorted() {
        let config = with_dates();
        let sources = config.from_currencies();
        let mut sorted = sources.clone();
        sorted.sort_unstable();
        assert_eq!(sources, sorted);
    }

    #[test]
    fn default_config_validates_with_dates() {
        assert!(with_dates().validate().is_ok());
    }

    #[test]
    fn empty_dates_rejected() {
        let config = EtlConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyDates)));
    }

    #[test]
    fn invalid_currency_code_rejected() {
        let mut config = with_dates();
        config
            .currencies
            .insert("usd".to_string(), "lowercase".to_string());

        match config.validate() {
            Err(ConfigError::InvalidCurrency(code)) => assert_eq!(code, "usd"),
            other => panic!("expected InvalidCurrency, got {other:?}"),
        }
    }

    #[test]
    fn four_letter_code_rejected() {
        let mut config = with_dates();
        config.target_currency = "EURO".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn toml_roundtrip_with_overrides() {
        let toml_str = r#"
target_currency = "EUR"
top_n = 3
dates = ["2024-02-12", "2024-02-13"]
rates_root = "out/rates"

[currencies]
USD = "United States Dollar"
GBP = "British Pound"
EUR = "Euro"
"#;
        let config = EtlConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.top_n, 3);
        assert_eq!(config.dates.len(), 2);
        assert_eq!(config.rates_root, PathBuf::from("out/rates"));
        assert_eq!(config.from_currencies(), vec!["GBP", "USD"]);
        // Omitted fields fall back to defaults
        assert_eq!(config.price_currency, "USD");
        assert_eq!(config.rates_api_root, DEFAULT_RATES_API_ROOT);
    }
}

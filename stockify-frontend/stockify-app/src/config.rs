use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SALES_LIMIT: u32 = 1000;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_THEME_FILE: &str = "stockify-theme.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },
    #[error("{key} must be a whole number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// Settings read from the environment at start-up.
///
/// | variable | default |
/// |---|---|
/// | `STOCKIFY_API_URL` | `http://localhost:5000/api` |
/// | `STOCKIFY_API_TOKEN` | none |
/// | `STOCKIFY_SALES_LIMIT` | `1000` |
/// | `STOCKIFY_FETCH_TIMEOUT_SECS` | `10`, `0` disables the timeout |
/// | `STOCKIFY_THEME_FILE` | `stockify-theme.json` |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub sales_limit: u32,
    pub fetch_timeout: Option<Duration>,
    pub theme_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = read("STOCKIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(api_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            key: "STOCKIFY_API_URL",
            source,
        })?;
        let sales_limit = match read("STOCKIFY_SALES_LIMIT") {
            Some(value) => parse_number("STOCKIFY_SALES_LIMIT", &value)?,
            None => DEFAULT_SALES_LIMIT,
        };
        let timeout_secs = match read("STOCKIFY_FETCH_TIMEOUT_SECS") {
            Some(value) => parse_number("STOCKIFY_FETCH_TIMEOUT_SECS", &value)?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(AppConfig {
            api_url,
            api_token: read("STOCKIFY_API_TOKEN"),
            sales_limit,
            fetch_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            theme_file: read("STOCKIFY_THEME_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THEME_FILE)),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

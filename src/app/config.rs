use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub app_id: String,
    pub rate_api_url: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub rate_timeout_ms: u64,
    pub fallback_rate: Option<f64>,
    pub new_rate_offset: f64,
    pub default_cost: f64,
    pub default_margin_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 9999,
            app_id: String::new(),
            rate_api_url: "https://openexchangerates.org/api/latest.json".to_string(),
            base_currency: "USD".to_string(),
            quote_currency: "VES".to_string(),
            rate_timeout_ms: 5000,
            fallback_rate: Some(30.0),
            new_rate_offset: 5.0,
            default_cost: 12.0,
            default_margin_percent: 30.0,
        }
    }
}

// Every field optional so a file only overrides what it names
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_port: Option<u16>,
    app_id: Option<String>,
    rate_api_url: Option<String>,
    base_currency: Option<String>,
    quote_currency: Option<String>,
    rate_timeout_ms: Option<u64>,
    fallback_rate: Option<f64>,
    new_rate_offset: Option<f64>,
    default_cost: Option<f64>,
    default_margin_percent: Option<f64>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Self {
        if let Some(problem) = dotenv_problem(dotenvy::dotenv()) {
            warn!("Ignoring .env file: {}", problem);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // FALLBACK_RATE=none disables the fallback entirely
        let fallback_rate = match lookup("FALLBACK_RATE") {
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => value.parse().ok().or(defaults.fallback_rate),
            None => defaults.fallback_rate,
        };

        Self {
            server_port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            app_id: lookup("OXR_APP_ID").unwrap_or(defaults.app_id),
            rate_api_url: lookup("OXR_API_URL").unwrap_or(defaults.rate_api_url),
            base_currency: lookup("BASE_CURRENCY").unwrap_or(defaults.base_currency),
            quote_currency: lookup("QUOTE_CURRENCY").unwrap_or(defaults.quote_currency),
            rate_timeout_ms: lookup("RATE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_timeout_ms),
            fallback_rate,
            new_rate_offset: lookup("NEW_RATE_OFFSET")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.new_rate_offset),
            default_cost: lookup("DEFAULT_COST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_cost),
            default_margin_percent: lookup("DEFAULT_MARGIN_PERCENT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_margin_percent),
        }
    }

    /// Applies the values of a TOML file on top of `self`.
    pub fn merge_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content)?;

        if let Some(v) = file.server_port {
            self.server_port = v;
        }
        if let Some(v) = file.app_id {
            self.app_id = v;
        }
        if let Some(v) = file.rate_api_url {
            self.rate_api_url = v;
        }
        if let Some(v) = file.base_currency {
            self.base_currency = v;
        }
        if let Some(v) = file.quote_currency {
            self.quote_currency = v;
        }
        if let Some(v) = file.rate_timeout_ms {
            self.rate_timeout_ms = v;
        }
        if let Some(v) = file.fallback_rate {
            self.fallback_rate = Some(v);
        }
        if let Some(v) = file.new_rate_offset {
            self.new_rate_offset = v;
        }
        if let Some(v) = file.default_cost {
            self.default_cost = v;
        }
        if let Some(v) = file.default_margin_percent {
            self.default_margin_percent = v;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.rate_api_url)
            .map_err(|e| ConfigError::Invalid(format!("rate_api_url {:?}: {}", self.rate_api_url, e)))?;

        if self.base_currency.len() != 3 || self.quote_currency.len() != 3 {
            return Err(ConfigError::Invalid(format!(
                "currency codes must have three letters, got {:?}/{:?}",
                self.base_currency, self.quote_currency
            )));
        }
        if self.rate_timeout_ms == 0 {
            return Err(ConfigError::Invalid("rate_timeout_ms must be positive".to_string()));
        }
        if let Some(rate) = self.fallback_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Invalid(format!("fallback_rate must be positive, got {}", rate)));
            }
        }
        if !(self.new_rate_offset.is_finite() && self.new_rate_offset >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "new_rate_offset must be zero or positive, got {}",
                self.new_rate_offset
            )));
        }
        if !(0.0..100.0).contains(&self.default_margin_percent) {
            return Err(ConfigError::Invalid(format!(
                "default_margin_percent must be in [0, 100), got {}",
                self.default_margin_percent
            )));
        }

        Ok(())
    }
}

// A missing .env is normal; anything else is worth reporting
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e.to_string()),
    }
}

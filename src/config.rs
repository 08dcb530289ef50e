use std::env;

use serde::Deserialize;

use crate::i18n;
use crate::services::recurrence::DEFAULT_SEARCH_YEARS;

/// Upper bound accepted for `RECURRENCE_SEARCH_YEARS`.
pub const MAX_SEARCH_YEARS: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub recurrence: RecurrenceConfig,
    pub store: StoreConfig,
    /// Language of generated texts (notification descriptions).
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// How many lunar years a yearly search inspects before giving up.
    pub search_years: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON array of notification settings loaded at startup. The store
    /// starts empty when unset.
    pub events_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let search_years = match env::var("RECURRENCE_SEARCH_YEARS") {
            Ok(v) => parse_search_years(&v)?,
            Err(_) => DEFAULT_SEARCH_YEARS,
        };

        let default_language = match env::var("DEFAULT_LANGUAGE") {
            Ok(v) => {
                let lang = i18n::normalize_language(&v);
                if !i18n::is_supported_language(&lang) {
                    return Err(ConfigError::InvalidValue("DEFAULT_LANGUAGE".to_string()));
                }
                lang
            }
            Err(_) => i18n::DEFAULT_LANG.to_string(),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            recurrence: RecurrenceConfig { search_years },
            store: StoreConfig {
                events_file: env::var("EVENTS_FILE").ok().filter(|v| !v.is_empty()),
            },
            default_language,
        })
    }
}

fn parse_search_years(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|years| (1..=MAX_SEARCH_YEARS).contains(years))
        .ok_or_else(|| ConfigError::InvalidValue("RECURRENCE_SEARCH_YEARS".to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                frontend_url: "http://localhost:3000".to_string(),
            },
            recurrence: RecurrenceConfig {
                search_years: DEFAULT_SEARCH_YEARS,
            },
            store: StoreConfig { events_file: None },
            default_language: i18n::DEFAULT_LANG.to_string(),
        }
    }
}

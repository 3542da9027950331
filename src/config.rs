use crate::domain::{Cents, Millicents};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    /// Value of the `StandaloneCrateCap` parameter.
    pub standalone_crate_cap: Cents,
    /// Diesel price the fuel surcharge difference is measured against.
    pub fuel_price_baseline: Millicents,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let standalone_crate_cap = env_map
            .get("STANDALONE_CRATE_CAP_CENTS")
            .map(|s| s.as_str())
            .unwrap_or("140000")
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "STANDALONE_CRATE_CAP_CENTS".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;

        let fuel_price_baseline = env_map
            .get("FUEL_PRICE_BASELINE_MILLICENTS")
            .map(|s| s.as_str())
            .unwrap_or("250000")
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "FUEL_PRICE_BASELINE_MILLICENTS".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;

        if standalone_crate_cap < 0 {
            return Err(ConfigError::InvalidValue(
                "STANDALONE_CRATE_CAP_CENTS".to_string(),
                format!("must not be negative, got {}", standalone_crate_cap),
            ));
        }

        Ok(Config {
            database_path,
            standalone_crate_cap: Cents::new(standalone_crate_cap),
            fuel_price_baseline: Millicents::new(fuel_price_baseline),
        })
    }

    /// Configuration for tests and embedding callers that only need defaults.
    pub fn with_database_path(database_path: &str) -> Self {
        Config {
            database_path: database_path.to_string(),
            standalone_crate_cap: Cents::new(140_000),
            fuel_price_baseline: Millicents::new(250_000),
        }
    }
}

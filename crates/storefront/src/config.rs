//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ECOSHOP_STORAGE` - Storage backend, `memory` or `file` (default: file)
//! - `ECOSHOP_DATA_DIR` - Directory for the file backend (default: .ecoshop)
//! - `ECOSHOP_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 100)
//! - `ECOSHOP_FLAT_SHIPPING` - Shipping charged below the threshold (default: 10)
//! - `ECOSHOP_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use ecoshop_core::Price;
use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where store snapshots are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local map; nothing survives a restart.
    Memory,
    /// One JSON document per key under the data directory.
    #[default]
    File,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(format!("expected `memory` or `file`, got `{other}`")),
        }
    }
}

/// Order summary pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Subtotals at or above this amount ship free.
    pub free_shipping_threshold: Price,
    /// Shipping charged below the threshold.
    pub flat_shipping: Price,
    /// Tax as a fraction of the subtotal (e.g. `0.08`).
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_cents(10_000),
            flat_shipping: Price::from_cents(1_000),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Storage backend for cart, favorites, and session snapshots
    pub storage: StorageBackend,
    /// Directory used by the file backend
    pub data_dir: PathBuf,
    /// Shipping and tax rules
    pub pricing: PricingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pricing: PricingConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

const DEFAULT_DATA_DIR: &str = ".ecoshop";

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = parse_env_or_default(&lookup, "ECOSHOP_STORAGE", StorageBackend::default())?;
        let data_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "ECOSHOP_DATA_DIR",
            DEFAULT_DATA_DIR,
        ));

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            free_shipping_threshold: get_price_or_default(
                &lookup,
                "ECOSHOP_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            flat_shipping: get_price_or_default(
                &lookup,
                "ECOSHOP_FLAT_SHIPPING",
                defaults.flat_shipping,
            )?,
            tax_rate: get_tax_rate_or_default(&lookup, "ECOSHOP_TAX_RATE", defaults.tax_rate)?,
        };

        Ok(Self {
            storage,
            data_dir,
            pricing,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable with `FromStr`, falling back to `default` when unset.
fn parse_env_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    get_optional_env(lookup, key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn get_price_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Price,
) -> Result<Price, ConfigError> {
    get_optional_env(lookup, key).map_or(Ok(default), |value| {
        Price::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn get_tax_rate_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let rate = parse_env_or_default(lookup, key, default)?;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be a fraction between 0 and 1 (got {rate})"),
        ));
    }
    Ok(rate)
}

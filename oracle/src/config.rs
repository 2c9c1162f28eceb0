//! Configuration management for the MicroCrop weather oracle
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MICROCROP_ prefix
//!
//! Missing required values (such as the WeatherXM API key) surface as a
//! typed configuration error at startup rather than a panic at load time.

use config::{Environment, File};
use serde::Deserialize;

use shared::GeoBounds;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// WeatherXM Pro API configuration
    pub weatherxm: WeatherXmConfig,

    /// Flow ledger configuration
    pub flow: FlowConfig,

    /// Polling and chain-sync configuration
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherXmConfig {
    /// API base URL
    pub base_url: String,

    /// API key sent in the X-API-Key header
    pub api_key: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Bounding box of the deployment region
    pub region: RegionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RegionConfig {
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.north, self.south, self.east, self.west)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlowConfig {
    /// Access node REST endpoint for read-only script execution
    pub access_node: String,

    /// Wallet gateway endpoint that signs and submits transactions
    pub gateway_url: String,

    /// Deployed OracleContract address
    pub oracle_address: String,

    /// Deployed InsurancePool address
    pub pool_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Seconds between observation polls
    pub poll_interval_seconds: u64,

    /// Seconds between on-chain weather pushes
    pub chain_sync_interval_seconds: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("MICROCROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("weatherxm.base_url", "https://pro.weatherxm.com/api/v1")?
            .set_default("weatherxm.api_key", "")?
            .set_default("weatherxm.timeout_seconds", 15)?
            // Kenya bounding box
            .set_default("weatherxm.region.north", 5.0)?
            .set_default("weatherxm.region.south", -5.0)?
            .set_default("weatherxm.region.east", 42.0)?
            .set_default("weatherxm.region.west", 34.0)?
            .set_default("flow.access_node", "https://rest-testnet.onflow.org")?
            .set_default("flow.gateway_url", "http://localhost:8701")?
            .set_default("flow.oracle_address", "0xa9642fdcc3bd17f8")?
            .set_default("flow.pool_address", "0xa9642fdcc3bd17f8")?
            .set_default("sync.poll_interval_seconds", 300)?
            .set_default("sync.chain_sync_interval_seconds", 600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MICROCROP_ prefix)
            .add_source(
                Environment::with_prefix("MICROCROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check values the defaults cannot supply.
    pub fn validate(&self) -> AppResult<()> {
        if self.weatherxm.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "weatherxm.api_key is required (set MICROCROP__WEATHERXM__API_KEY)".to_string(),
            ));
        }
        if self.sync.poll_interval_seconds == 0 || self.sync.chain_sync_interval_seconds == 0 {
            return Err(AppError::Configuration(
                "sync intervals must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

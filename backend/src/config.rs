//! Configuration management for the Gas Certificate Manager
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides (`GASCERT__SECTION__KEY`, e.g. `GASCERT__SERVER__PORT`)
//!
//! Business settings (company, credentials, validity, alert thresholds) are
//! not configured here; they live in the persisted settings file and are
//! edited through the API.

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Persistence configuration
    pub storage: StorageConfig,

    /// Background job intervals
    pub jobs: JobsConfig,

    /// Bootstrap authentication configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the JSON state files
    pub data_dir: PathBuf,

    /// Seed one sample client and certificate when no data exists
    pub seed_sample_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    /// Interval between certificate status refreshes, in seconds
    pub status_refresh_secs: u64,

    /// Interval between idle session checks, in seconds
    pub session_check_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Password hashed into the settings file the first time it is created
    pub bootstrap_password: String,

    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GASCERT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.seed_sample_data", true)?
            .set_default("jobs.status_refresh_secs", 86_400)?
            .set_default("jobs.session_check_secs", 60)?
            .set_default("auth.bootstrap_password", "gestion123")?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GASCERT__ prefix)
            .add_source(
                Environment::with_prefix("GASCERT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration for tests and embedded use, rooted at `data_dir`
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig {
                data_dir: data_dir.into(),
                seed_sample_data: false,
            },
            jobs: JobsConfig::default(),
            auth: AuthConfig {
                bootstrap_password: "gestion123".to_string(),
                bcrypt_cost: 4,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            status_refresh_secs: 86_400,
            session_check_secs: 60,
        }
    }
}

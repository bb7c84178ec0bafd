//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Reporting configuration.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://onchaincounting.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    1 // single writer
}

/// Reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// IANA time zone used for calendar years and month buckets.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Fixed VAT percentage applied to deductible expenses.
    #[serde(default = "default_deductible_vat_percent")]
    pub deductible_vat_percent: f64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            deductible_vat_percent: default_deductible_vat_percent(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_deductible_vat_percent() -> f64 {
    20.0
}

impl ReportingConfig {
    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn timezone(&self) -> Result<Tz, config::ConfigError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown time zone '{}'", self.timezone))
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ONCHAINCOUNTING").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `CHORE_WHEEL` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use chore_wheel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Claims need {} votes", config.governance.claim_min_votes);
//! ```

mod database;
mod error;
mod governance;
mod runtime;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use governance::GovernanceConfig;
pub use runtime::{Environment, RuntimeConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Environment and logging
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// House rules for polls, hearts, and chores
    #[serde(default)]
    pub governance: GovernanceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHORE_WHEEL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CHORE_WHEEL__DATABASE__URL=...` -> `database.url = ...`
    /// - `CHORE_WHEEL__GOVERNANCE__POINTS_PER_RESIDENT=120` -> `governance.points_per_resident = 120`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHORE_WHEEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.runtime.validate()?;
        self.governance.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CHORE_WHEEL__DATABASE__URL", "postgresql://test@localhost/chores");
    }

    fn clear_env() {
        env::remove_var("CHORE_WHEEL__DATABASE__URL");
        env::remove_var("CHORE_WHEEL__RUNTIME__ENVIRONMENT");
        env::remove_var("CHORE_WHEEL__GOVERNANCE__POINTS_PER_RESIDENT");
        env::remove_var("CHORE_WHEEL__GOVERNANCE__CLAIM_MIN_VOTES");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/chores");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_governance_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.governance, GovernanceConfig::default());
        assert_eq!(config.runtime.environment, Environment::Development);
    }

    #[test]
    fn test_governance_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHORE_WHEEL__GOVERNANCE__POINTS_PER_RESIDENT", "120");
        env::set_var("CHORE_WHEEL__GOVERNANCE__CLAIM_MIN_VOTES", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.governance.points_per_resident, 120.0);
        assert_eq!(config.governance.claim_min_votes, 3);
    }

    #[test]
    fn test_production_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHORE_WHEEL__RUNTIME__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.runtime.is_production());
        assert!(config.runtime.use_json_logs());
    }

    #[test]
    fn test_missing_database_url_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}

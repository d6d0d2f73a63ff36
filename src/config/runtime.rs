//! Runtime configuration: environment and logging.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Process-level settings for the sweep driver.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Environment name
    #[serde(default)]
    pub environment: Environment,

    /// `tracing` filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Force JSON (true) or human-readable (false) logs; defaults by environment
    pub json_logs: Option<bool>,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// JSON logs in production unless overridden.
    pub fn use_json_logs(&self) -> bool {
        self.json_logs.unwrap_or_else(|| self.is_production())
    }

    pub fn env_filter(&self) -> Result<EnvFilter, ValidationError> {
        EnvFilter::try_new(&self.log_level)
            .map_err(|_| ValidationError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.env_filter().map(|_| ())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
            json_logs: None,
        }
    }
}

fn default_log_level() -> String {
    "info,chore_wheel=debug,sqlx=warn".to_string()
}

//! Application configuration
//!
//! Loaded from environment variables with the `STUDY_GENIUS` prefix. Nested
//! values are separated by a double underscore, so `STUDY_GENIUS__SERVER__PORT`
//! sets `server.port`. A `.env` file is read first when present.
//!
//! ```no_run
//! use study_genius::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod flows;
mod server;
mod supabase;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use flows::FlowConfig;
pub use server::{Environment, ServerConfig};
pub use supabase::SupabaseConfig;

use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Postgres holding the `profiles` and `exams` tables
    pub database: DatabaseConfig,

    /// Hosted auth service
    pub supabase: SupabaseConfig,

    /// Image editing model
    #[serde(default)]
    pub ai: AiConfig,

    /// Handler deadlines
    #[serde(default)]
    pub flows: FlowConfig,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` when a required variable is missing
    /// or a value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STUDY_GENIUS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Check every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.supabase.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.flows.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

//! Application configuration schemas.
//!
//! Deserialized with the `config` crate from `<dir>/default.toml`, an
//! optional `<dir>/<env>.toml` overlay and `PARLOR__SECTION__KEY`
//! environment variables, in that order of precedence.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod profile_images;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::profile_images::ProfileImagesConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Session cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Password policy settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Profile image pipeline settings.
    #[serde(default)]
    pub profile_images: ProfileImagesConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate configuration from `dir` for the environment `env`.
    pub fn load(dir: impl AsRef<Path>, env: &str) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let default_path = dir.join("default").to_string_lossy().into_owned();
        let env_path = dir.join(env).to_string_lossy().into_owned();

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_path).required(false))
            .add_source(config::File::with_name(&env_path).required(false))
            .add_source(
                config::Environment::with_prefix("PARLOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with, listing every problem.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        if self.server.port == 0 {
            problems.push("server.port must not be 0");
        }
        if self.database.url.trim().is_empty() {
            problems.push("database.url must be set");
        }
        if self.profile_images.root_dir.trim().is_empty() {
            problems.push("profile_images.root_dir must be set");
        }
        if self.profile_images.max_concurrent_jobs == 0 {
            problems.push("profile_images.max_concurrent_jobs must be at least 1");
        }
        if self.session.expiration_minutes == 0 {
            problems.push("session.expiration_minutes must be at least 1");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::configuration(problems.join("; ")))
        }
    }
}

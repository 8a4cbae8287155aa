//! SeedFront Core - data access and configuration for the SeedboxSync dashboard
//!
//! This crate reads what the SeedboxSync CLI leaves behind: its YAML
//! configuration and its SQLite database. It also groups downloads into
//! statistics and formats sizes for display.

pub mod config;
pub mod db;
pub mod settings;
pub mod stats;
pub mod tracing_setup;
pub mod units;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

pub use config::{ConfigError, FrontConfig, SyncConfig};
pub use db::{Database, DbError};
pub use settings::{SettingsDocument, SettingsError, SettingsForm, SettingsSubmission};
pub use stats::{Period, PeriodStat};

/// Core errors that can bubble up from any SeedFront subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SeedfrontError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeedfrontError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            SeedfrontError::Config(ConfigError::NotFound { .. }) => {
                "No SeedboxSync configuration file found!".to_string()
            }
            SeedfrontError::Config(ConfigError::Load { path, .. }) => {
                format!("Can't read configuration file {}", path.display())
            }
            SeedfrontError::Database(DbError::Missing { .. }) => {
                "Can't load seedbox database!".to_string()
            }
            SeedfrontError::Database(_) => "Database error occurred".to_string(),
            SeedfrontError::Settings(e) => match e {
                SettingsError::Io(_) | SettingsError::Yaml(_) | SettingsError::NotMapping => {
                    "Settings could not be saved".to_string()
                }
                other => other.to_string(),
            },
            SeedfrontError::Io(_) => "File system error occurred".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedfrontError>;

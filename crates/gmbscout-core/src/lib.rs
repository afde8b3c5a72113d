//! Shared domain types and configuration for gmbscout.
//!
//! Holds the [`BusinessRecord`] input shape consumed by the scoring pipeline,
//! env-var application config, and the YAML niche definitions.

pub mod app_config;
pub mod config;
pub mod niches;
pub mod record;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use niches::{load_niches, NicheConfig, NichesFile};
pub use record::{BusinessRecord, OpeningHours, ReviewSample};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read niches file {path}: {source}")]
    NichesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse niches file: {0}")]
    NichesFileParse(#[source] serde_yaml::Error),

    #[error("niche config validation failed: {0}")]
    Validation(String),
}

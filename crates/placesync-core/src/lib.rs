pub mod app_config;
pub mod collections;
pub mod config;
pub mod record;

pub use app_config::{AppConfig, Environment, ProviderKind};
pub use collections::{load_records, RecordEntry, RecordsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{
    checked_latitude, checked_longitude, Category, MarkerKey, MergedResult, SearchSession,
    SearchableRecord, SourceTag, UnknownCategory,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read records file {path}: {source}")]
    RecordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML records file: {0}")]
    RecordsFileYaml(#[source] serde_yaml::Error),

    #[error("failed to parse JSON records file: {0}")]
    RecordsFileJson(#[source] serde_json::Error),

    #[error("records validation error: {0}")]
    Validation(String),
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment override failed: {0}")]
    Environment(#[from] ::config::ConfigError),

    #[error("invalid empty-parents policy: {0} (expected \"reject\" or \"ignore\")")]
    InvalidPolicy(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

//! Error types
//!
//! Only startup can fail: a missing asset or a bad tuning/settings document.
//! Once the loop is running the simulation clamps instead of erroring.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{name}` is not available")]
    Missing { name: String },
    #[error("failed to read asset `{name}` from {}: {source}", .path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("asset loading failed: {0}")]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! Error types for docket.

use std::path::PathBuf;

use thiserror::Error;

/// Docket error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("git error: {0}")]
    Git(String),

    #[error("Timed out waiting for lock: {}", .0.display())]
    LockTimeout(PathBuf),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Host config directory not found (pass --config-dir)")]
    ConfigDirNotFound,

    #[error("No code files found for mode '{0}'")]
    NoFiles(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an ad-hoc error from a message.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

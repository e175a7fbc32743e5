// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchmuxError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Native watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The ancestor walk reached the filesystem root without finding an
    /// existing directory to subscribe at.
    #[error("No existing ancestor directory to watch for path: {0}")]
    Resolution(String),

    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchmuxError>;

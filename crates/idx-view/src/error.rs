//! Error types for loading, rendering and configuration.

use std::path::PathBuf;

use idx_format::{DecodeError, EncodeError, LookupError};
use thiserror::Error;

/// Failure to obtain or parse one fetched resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("resource `{resource}` not found")]
    NotFound { resource: String },
    #[error("failed to read `{resource}`: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed mismatch list in `{resource}`: {source}")]
    Malformed {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("a batch render is already running on this renderer")]
    AlreadyRunning,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for engine construction and configuration.
//!
//! Enqueue operations never fail; these only surface while building an
//! engine or loading its configuration.

use std::path::PathBuf;

use crate::backend::BackendError;

/// Errors raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration from {}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    /// The configuration was not valid JSON for this schema
    #[error("Malformed configuration")]
    Json(#[from] serde_json::Error),

    /// Suggestion bounds are empty or inverted
    #[error("Invalid suggestion range {min}..={max}")]
    InvalidSuggestionRange { min: usize, max: usize },
}

/// Errors that can occur while creating or installing an engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The worker thread could not be started
    #[error("Failed to spawn worker thread")]
    Spawn(#[source] std::io::Error),

    /// A process-wide engine is already installed
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// No backend is registered under the requested name
    #[error("Unknown backend `{0}`")]
    UnknownBackend(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

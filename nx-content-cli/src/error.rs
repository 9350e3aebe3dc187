use thiserror::Error;

use nx_content_lib::{LoadError, SettingsError};
use nx_content_sources::SourceError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Remote source or cache error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Preferences could not be read, changed or saved
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// Title identifier given on the command line isn't in the catalog
    #[error("Title not found: {0}")]
    NotFound(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

use thiserror::Error;

use nx_content_sources::SourceError;

/// Errors that end a catalog load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A source couldn't be fetched or parsed
    #[error("Failed to load content data: {0}")]
    Source(#[from] SourceError),

    /// The sources parsed but produced nothing to show
    #[error("No content found in {0}")]
    Empty(String),
}

/// Errors reading or changing preferences.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown preference '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl SettingsError {
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

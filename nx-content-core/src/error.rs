use thiserror::Error;

/// Errors produced when parsing identifiers and versions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Identifier is not 16 hexadecimal digits
    #[error("Invalid title ID '{0}': expected 16 hexadecimal digits")]
    InvalidTitleId(String),

    /// Version string could not be encoded
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// Unknown content role name
    #[error("Unknown content type '{0}' (expected base, update or dlc)")]
    UnknownRole(String),
}

impl CoreError {
    pub fn invalid_title_id(msg: impl Into<String>) -> Self {
        Self::InvalidTitleId(msg.into())
    }

    pub fn invalid_version(msg: impl Into<String>) -> Self {
        Self::InvalidVersion(msg.into())
    }
}

//! Error types for codehelper

use thiserror::Error;

/// Result type alias for codehelper operations
pub type Result<T> = std::result::Result<T, CodeHelperError>;

/// Codehelper error types
#[derive(Error, Debug)]
pub enum CodeHelperError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("{0}")]
    Message(String),
}

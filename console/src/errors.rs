//! Error types for the Ajime console

use thiserror::Error;

/// Main error type for the Ajime console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// The allow-list handed to an editor shares no kind with the known kinds.
    /// This is a wiring mistake in the caller, never bad user input.
    #[error("No selectable condition kind in allow-list {0:?}")]
    NoSelectableKinds(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Index {index} out of range for {what} of length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::ConfigError(err.to_string())
    }
}

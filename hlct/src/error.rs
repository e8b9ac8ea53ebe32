//! Error handling module for the hlct CLI.
//!
//! Wraps library errors and the I/O, TOML and JSON failures of the
//! front end in one `thiserror` enum.

use hlc_layout::LayoutError;
use thiserror::Error;

/// Main error type for the hlct CLI application.
#[derive(Error, Debug)]
pub enum HlctError {
    /// Error when the configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when command-line input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from the layout calculator.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using HlctError.
pub type Result<T> = std::result::Result<T, HlctError>;

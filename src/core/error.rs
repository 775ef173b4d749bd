//! Error types for data file loading.

use thiserror::Error;

/// Errors that can occur when loading enemy or wave data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A value parsed fine but makes no sense for the game.
    #[error("Invalid value for '{field}' in '{path}': {details}")]
    InvalidValue {
        path: String,
        field: &'static str,
        details: String,
    },
}

// src/error.rs

//! Unified error handling for the indexer application.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for indexer operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSV read/write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Feed pagination failed for one author.
    ///
    /// Aborts that author's entire indexing pass; the batch runner catches
    /// this variant, logs it and moves on to the next author.
    #[error("Feed error for {author}: {message}")]
    Feed { author: String, message: String },

    /// Index file is corrupt (malformed timestamp or row).
    ///
    /// Never caught: a broken index file is a configuration error, not a
    /// runtime condition to recover from.
    #[error("Index file {path} is corrupt: {message}")]
    Index { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a feed error for the given author.
    pub fn feed(author: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Feed {
            author: author.into(),
            message: message.to_string(),
        }
    }

    /// Create an index-file corruption error.
    pub fn index(path: &Path, message: impl fmt::Display) -> Self {
        Self::Index {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

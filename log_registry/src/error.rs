//! Error types for the log stream registry.
//!
//! The registry itself never produces a [`FetchError`]; it only passes along
//! whatever the page source returned, unchanged.

use thiserror::Error;

/// Failure reported by a [`PageSource`](crate::PageSource).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote source rejected or failed the request.
    #[error("log source error: {0}")]
    Source(String),

    /// The pagination token handed back to the source was not one it issued.
    #[error("invalid pagination token: {0:?}")]
    InvalidToken(String),
}

/// Failure to parse a [`LogUri`](crate::LogUri).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("missing scheme separator in {0:?}")]
    MissingScheme(String),

    #[error("empty scheme in {0:?}")]
    EmptyScheme(String),

    #[error("empty path in {0:?}")]
    EmptyPath(String),
}

/// Failure to load a [`Settings`](crate::Settings) file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

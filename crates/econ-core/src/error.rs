//! Error types for series operations.
//!
//! This module defines [`EconError`] which covers all error cases that can occur
//! when fetching, resampling, caching, or laying out economic series data.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during series and report operations.
#[derive(Error, Debug)]
pub enum EconError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested series was not found.
    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    /// The series exists but returned no observations for the requested range.
    #[error("Data not available for {series} starting {start}")]
    DataNotAvailable {
        /// The series that was requested.
        series: String,
        /// Start of the requested range, or `all`.
        start: String,
    },

    /// Error parsing data from a provider or a cache file.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An image referenced by a report section could not be read.
    #[error("Missing image {path}: {reason}")]
    MissingImage {
        /// Path of the image.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Error producing the report document.
    #[error("Render error: {0}")]
    Render(String),

    /// Filesystem error outside the cache.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`EconError`].
pub type Result<T> = std::result::Result<T, EconError>;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/econ/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for economic series providers.
//!
//! This crate provides the foundational abstractions for fetching and caching series:
//!
//! - [`SeriesProvider`](provider::SeriesProvider) - Remote source of dated series
//! - [`SeriesCache`](cache::SeriesCache) - Whole-table caching abstraction
//! - [`SeriesRequest`](request::SeriesRequest) - Request parameters and cache key derivation
//! - [`SeriesTable`](types::SeriesTable) - Outer-joined collection of series
//! - [`resample`](frequency::resample) - Periodic-mean downsampling

/// Cache trait for storing fetched tables.
pub mod cache;
/// Error types for series and report operations.
pub mod error;
/// Polars frame conversions used by persistent caches.
pub mod frame;
/// Frequency definitions and resampling.
pub mod frequency;
/// Provider traits for fetching series.
pub mod provider;
/// Requests and cache keys.
pub mod request;
/// Core data types (SeriesId, Series, SeriesTable, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::SeriesCache;
pub use error::{EconError, Result};
pub use frame::{frame_to_table, table_to_frame};
pub use frequency::{Frequency, resample};
pub use provider::{DataProvider, SeriesProvider};
pub use request::{CacheFormat, CacheKey, SeriesRequest};
pub use types::{Observation, Series, SeriesId, SeriesTable, TableRow};

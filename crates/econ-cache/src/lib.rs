#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/econ/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for economic series tables.
//!
//! This crate provides implementations of the [`SeriesCache`] trait from `econ-core`:
//!
//! - [`FileCache`] - Persistent CSV/Parquet files in a results directory (default, requires `file` feature)
//! - [`InMemoryCache`] - Simple in-memory cache for testing
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

/// File-based cache implementation.
#[cfg(feature = "file")]
pub mod file;

// Re-export the trait for convenience
pub use econ_core::SeriesCache;

// Re-export implementations
pub use memory::InMemoryCache;
pub use noop::NoopCache;

#[cfg(feature = "file")]
pub use file::{DEFAULT_RESULTS_DIR, FileCache};

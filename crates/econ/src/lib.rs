#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/econ/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fetch, cache and report on economic time series.
//!
//! This crate re-exports the core types, cache implementations, the FRED
//! provider and the report builder, and provides [`SeriesStore`], which
//! combines a provider and a cache with per-series retry.
//!
//! # Features
//!
//! - `fred` - FRED provider
//! - `cache-file` - CSV/Parquet file cache
//! - `report` - PDF report builder
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use econ::{FileCache, SeriesRequest, SeriesStore};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> econ::Result<()> {
//!     let store = SeriesStore::fred(&std::env::var("FRED_API_KEY").unwrap_or_default())?
//!         .with_cache(Arc::new(FileCache::new("results")));
//!
//!     let request = SeriesRequest::new(["DFF"])
//!         .with_start(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
//!     let table = store.fetch(&request).await;
//!     println!("{} series", table.len());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use econ_core::*;

// Cache implementations
#[cfg(feature = "cache-file")]
pub use econ_cache::FileCache;
pub use econ_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "fred")]
pub use econ_fred::FredProvider;

// Report builder
#[cfg(feature = "report")]
pub use econ_report as report;

mod retry;
mod store;
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
pub use store::SeriesStore;

//! Provider traits for fetching series from a remote source.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`SeriesProvider`] - Dated numeric series by identifier

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{Series, SeriesId},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FRED").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider of dated numeric series.
#[async_trait]
pub trait SeriesProvider: DataProvider {
    /// Fetches one series in its native frequency.
    ///
    /// `start` limits the result to observations on or after that date; `None`
    /// fetches the full history. A single call is one network round trip;
    /// retrying is the caller's business.
    async fn fetch_series(&self, id: &SeriesId, start: Option<NaiveDate>) -> Result<Series>;
}

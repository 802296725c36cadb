//! Cache trait for storing fetched series tables.
//!
//! This module defines the [`SeriesCache`] trait that provides a unified interface
//! for persisting whole [`SeriesTable`]s keyed by their [`SeriesRequest`].

use async_trait::async_trait;

use crate::{error::Result, request::SeriesRequest, types::SeriesTable};

/// Trait for caching fetched series tables.
///
/// Entries are all-or-nothing per request signature: a table is written and
/// read as a unit, never merged or partially updated. Implementations decide
/// where the data lives (files, memory, nowhere).
#[async_trait]
pub trait SeriesCache: Send + Sync {
    /// Retrieves the cached table for a request.
    ///
    /// Returns `Ok(Some(table))` on a hit and `Ok(None)` on a miss. Entries that
    /// exist but cannot be decoded are reported as misses.
    async fn get(&self, request: &SeriesRequest) -> Result<Option<SeriesTable>>;

    /// Stores a table for a request, replacing any previous entry.
    async fn put(&self, request: &SeriesRequest, table: &SeriesTable) -> Result<()>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}

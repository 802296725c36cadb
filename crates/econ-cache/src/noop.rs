//! No-op cache implementation.

use async_trait::async_trait;
use econ_core::{Result, SeriesCache, SeriesRequest, SeriesTable};
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// `get` always returns `Ok(None)` and `put` always returns `Ok(())`.
/// Useful for disabling caching or testing code paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SeriesCache for NoopCache {
    async fn get(&self, _request: &SeriesRequest) -> Result<Option<SeriesTable>> {
        trace!("NoopCache: get called, returning None");
        Ok(None)
    }

    async fn put(&self, _request: &SeriesRequest, _table: &SeriesTable) -> Result<()> {
        trace!("NoopCache: put called, doing nothing");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopCache: clear called, doing nothing");
        Ok(())
    }
}

//! In-memory cache implementation.

use async_trait::async_trait;
use econ_core::{CacheKey, Result, SeriesCache, SeriesRequest, SeriesTable};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory cache for testing and development.
///
/// Tables are stored in a `RwLock`-protected `HashMap` keyed by
/// [`CacheKey`] and are lost when the cache is dropped. Tables are cloned on
/// get/put. The serialization format of a request is irrelevant here.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    tables: RwLock<HashMap<CacheKey, SeriesTable>>,
    writes: AtomicUsize,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.is_empty()
    }

    /// Number of successful `put` calls since creation.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SeriesCache for InMemoryCache {
    #[instrument(skip(self, request), fields(key = %request.cache_key()))]
    async fn get(&self, request: &SeriesRequest) -> Result<Option<SeriesTable>> {
        let cache = self.tables.read().await;
        match cache.get(&request.cache_key()) {
            Some(table) => {
                debug!("Cache hit for series table");
                Ok(Some(table.clone()))
            }
            None => {
                debug!("Cache miss for series table");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, request, table), fields(key = %request.cache_key()))]
    async fn put(&self, request: &SeriesRequest, table: &SeriesTable) -> Result<()> {
        let mut cache = self.tables.write().await;
        cache.insert(request.cache_key(), table.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!("Cached {} series", table.len());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.tables.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

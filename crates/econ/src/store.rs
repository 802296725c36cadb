//! Series store: cache lookup, per-series fetch with retry, and table assembly.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use econ_cache::NoopCache;
use econ_core::{
    Frequency, Result, Series, SeriesCache, SeriesId, SeriesProvider, SeriesRequest,
    SeriesTable, resample,
};

use crate::retry::RetryPolicy;

/// Fetches series tables, serving repeated requests from a cache.
///
/// A fetch never fails as a whole. Each series is tried independently up to
/// the retry ceiling; series that still fail are logged and left out of the
/// result. A request where every series failed yields an empty table, which
/// is never cached.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use econ::{FileCache, FredProvider, SeriesRequest, SeriesStore};
///
/// let store = SeriesStore::new(Arc::new(FredProvider::from_env()?))
///     .with_cache(Arc::new(FileCache::new("results")));
///
/// let table = store.fetch(&SeriesRequest::new(["DFF", "DGS10"])).await;
/// if table.is_empty() {
///     eprintln!("no data");
/// }
/// ```
pub struct SeriesStore {
    provider: Arc<dyn SeriesProvider>,
    cache: Arc<dyn SeriesCache>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for SeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesStore")
            .field("provider", &self.provider.name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SeriesStore {
    /// Create a store without caching and with the default retry policy.
    #[must_use]
    pub fn new(provider: Arc<dyn SeriesProvider>) -> Self {
        Self {
            provider,
            cache: Arc::new(NoopCache::new()),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a store backed by the FRED API.
    ///
    /// # Errors
    /// Returns an error if the FRED HTTP client cannot be built.
    #[cfg(feature = "fred")]
    pub fn fred(api_key: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(econ_fred::FredProvider::new(api_key)?)))
    }

    /// Set the cache for this store.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn SeriesCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the retry policy for provider calls.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch every series in the request as one outer-joined table.
    ///
    /// Columns follow request order, minus series that failed. Callers detect
    /// total failure by checking [`SeriesTable::is_empty`].
    pub async fn fetch(&self, request: &SeriesRequest) -> SeriesTable {
        match self.cache.get(request).await {
            Ok(Some(cached)) => {
                debug!(
                    key = %request.cache_key(),
                    series = cached.len(),
                    "Cache hit for series table"
                );
                return cached;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, fetching fresh data");
            }
        }

        let frequency = request.frequency().unwrap_or_default();
        let mut table = SeriesTable::new();
        for id in request.series_ids() {
            match self.fetch_with_retry(id, request.start_date()).await {
                Ok(series) => table.push(Self::apply_frequency(series, frequency)),
                Err(e) => {
                    warn!(
                        provider = self.provider.name(),
                        series = %id,
                        error = %e,
                        "Giving up on series"
                    );
                }
            }
        }

        if table.is_empty() {
            warn!(
                requested = request.series_ids().len(),
                "No series could be fetched"
            );
            return table;
        }

        if let Err(e) = self.cache.put(request, &table).await {
            warn!(error = %e, "Failed to cache series table");
        }
        info!(
            fetched = table.len(),
            requested = request.series_ids().len(),
            "Fetched series table"
        );
        table
    }

    /// Call the provider until it succeeds or the attempt ceiling is reached.
    ///
    /// The last attempt's error is returned unchanged.
    async fn fetch_with_retry(&self, id: &SeriesId, start: Option<NaiveDate>) -> Result<Series> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;
        loop {
            debug!(
                provider = self.provider.name(),
                series = %id,
                attempt,
                "Fetching series"
            );
            match self.provider.fetch_series(id, start).await {
                Ok(series) => return Ok(series),
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    warn!(
                        series = %id,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    if !self.retry.delay().is_zero() {
                        sleep(self.retry.delay()).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    fn apply_frequency(series: Series, frequency: Frequency) -> Series {
        match frequency {
            Frequency::Native => series,
            _ => resample(&series, frequency),
        }
    }
}

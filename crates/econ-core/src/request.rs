//! Fetch requests and their cache keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::EconError;
use crate::frequency::Frequency;
use crate::types::SeriesId;

/// Placeholder used in cache keys when no start date is given.
const ALL_DATES: &str = "all";

/// Separator between cache key components.
const KEY_SEPARATOR: char = '|';

/// Serialization used for a persisted [`SeriesTable`](crate::SeriesTable).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheFormat {
    /// Comma separated text, one row per date.
    #[default]
    Csv,
    /// Apache Parquet binary file.
    Parquet,
}

impl CacheFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl FromStr for CacheFormat {
    type Err = EconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" | "pq" => Ok(Self::Parquet),
            other => Err(EconError::InvalidParameter(format!(
                "unknown cache format '{other}'"
            ))),
        }
    }
}

/// A request for one or more series.
///
/// Built once and then only read; the builder methods consume `self`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesRequest {
    series_ids: Vec<SeriesId>,
    start_date: Option<NaiveDate>,
    frequency: Option<Frequency>,
    format: CacheFormat,
}

impl SeriesRequest {
    /// Creates a request for the given identifiers, all dates, native frequency.
    #[must_use]
    pub fn new<I, S>(series_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SeriesId>,
    {
        Self {
            series_ids: series_ids.into_iter().map(Into::into).collect(),
            start_date: None,
            frequency: None,
            format: CacheFormat::default(),
        }
    }

    /// Restricts the request to observations on or after `start`.
    #[must_use]
    pub const fn with_start(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Requests the series resampled to `frequency`.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Selects how the result is persisted in the cache.
    #[must_use]
    pub const fn with_format(mut self, format: CacheFormat) -> Self {
        self.format = format;
        self
    }

    /// Identifiers in caller order.
    #[must_use]
    pub fn series_ids(&self) -> &[SeriesId] {
        &self.series_ids
    }

    /// Start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Requested frequency, if any.
    #[must_use]
    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Cache serialization format.
    #[must_use]
    pub const fn format(&self) -> CacheFormat {
        self.format
    }

    /// Derives the cache key for this request.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_request(self)
    }
}

/// Order-independent digest of a request's parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key: sorted identifiers, start date (or `all`) and
    /// frequency (or `native`), joined and hashed.
    #[must_use]
    pub fn for_request(request: &SeriesRequest) -> Self {
        Self::digest(&Self::signature(request))
    }

    /// The plain-text signature that is hashed into the key.
    #[must_use]
    pub fn signature(request: &SeriesRequest) -> String {
        let mut ids: Vec<&str> = request.series_ids.iter().map(SeriesId::as_str).collect();
        ids.sort_unstable();
        let start = request
            .start_date
            .map_or_else(|| ALL_DATES.to_string(), |d| d.format("%Y-%m-%d").to_string());
        let frequency = request.frequency.unwrap_or_default();

        format!(
            "{ids}{sep}{start}{sep}{frequency}",
            ids = ids.join(","),
            sep = KEY_SEPARATOR
        )
    }

    fn digest(signature: &str) -> Self {
        let hash = Sha256::digest(signature.as_bytes());
        Self(format!("{hash:x}"))
    }

    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe file name for this key in the given format.
    #[must_use]
    pub fn file_name(&self, format: CacheFormat) -> String {
        format!("series_{}.{}", self.0, format.extension())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    #[test]
    fn test_cache_key_ignores_id_order() {
        let ab = SeriesRequest::new(["DGS2", "DGS10"]).with_start(start());
        let ba = SeriesRequest::new(["DGS10", "DGS2"]).with_start(start());
        assert_eq!(ab.cache_key(), ba.cache_key());
    }

    #[test]
    fn test_cache_key_depends_on_parameters() {
        let base = SeriesRequest::new(["DFF"]);
        let dated = base.clone().with_start(start());
        let monthly = base.clone().with_frequency(Frequency::Monthly);
        assert_ne!(base.cache_key(), dated.cache_key());
        assert_ne!(base.cache_key(), monthly.cache_key());
        assert_ne!(dated.cache_key(), monthly.cache_key());
    }

    #[test]
    fn test_signature_sentinels() {
        let request = SeriesRequest::new(["dgs10", "DFF"]);
        assert_eq!(CacheKey::signature(&request), "DFF,DGS10|all|native");

        let request = request.with_start(start()).with_frequency(Frequency::Quarterly);
        assert_eq!(CacheKey::signature(&request), "DFF,DGS10|2020-01-01|q");
    }

    #[test]
    fn test_native_frequency_matches_unset() {
        let unset = SeriesRequest::new(["DFF"]);
        let native = SeriesRequest::new(["DFF"]).with_frequency(Frequency::Native);
        assert_eq!(unset.cache_key(), native.cache_key());
    }

    #[test]
    fn test_file_name_is_filesystem_safe() {
        let key = SeriesRequest::new(["DFF", "T10Y2Y"]).cache_key();
        let name = key.file_name(CacheFormat::Parquet);
        assert!(name.ends_with(".parquet"));
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        );
        assert_eq!(key.as_str().len(), 64);
    }
}

//! File-based cache implementation.

use async_trait::async_trait;
use econ_core::{
    CacheFormat, EconError, Result, SeriesCache, SeriesRequest, SeriesTable, frame_to_table,
    table_to_frame,
};
use polars::prelude::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Prefix shared by every cache file name.
const FILE_PREFIX: &str = "series_";

/// Default results directory, relative to the working directory.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Cache that keeps one file per request signature in a results directory.
///
/// File names are derived from [`SeriesRequest::cache_key`], so requests that
/// differ only in identifier order share an entry. The extension follows the
/// request's [`CacheFormat`]; the same format is used to read and write.
///
/// Writes go to a temporary sibling file that is renamed over the target, so
/// an interrupted write leaves any previous entry intact.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the results directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path a request is cached at.
    #[must_use]
    pub fn path_for(&self, request: &SeriesRequest) -> PathBuf {
        self.dir
            .join(request.cache_key().file_name(request.format()))
    }

    fn read_table(path: &Path, format: CacheFormat) -> Result<SeriesTable> {
        let df = match format {
            CacheFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .map_err(|e| EconError::Parse(e.to_string()))?
                .finish()
                .map_err(|e| EconError::Parse(e.to_string()))?,
            CacheFormat::Parquet => {
                let file = File::open(path)?;
                ParquetReader::new(file)
                    .finish()
                    .map_err(|e| EconError::Parse(e.to_string()))?
            }
        };
        frame_to_table(&df)
    }

    fn write_table(&self, path: &Path, format: CacheFormat, table: &SeriesTable) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            EconError::Cache(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let mut df = table_to_frame(table)?;
        let temp_path = path.with_extension(format!("{}.tmp", format.extension()));

        let written = Self::write_frame(&temp_path, format, &mut df)
            .and_then(|()| fs::rename(&temp_path, path).map_err(EconError::from));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written.map_err(|e| EconError::Cache(format!("cannot write {}: {e}", path.display())))
    }

    fn write_frame(path: &Path, format: CacheFormat, df: &mut DataFrame) -> Result<()> {
        let mut file = File::create(path)?;
        match format {
            CacheFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(df),
            CacheFormat::Parquet => ParquetWriter::new(&mut file).finish(df).map(|_| ()),
        }
        .map_err(|e| EconError::Cache(e.to_string()))?;
        file.sync_all()?;
        Ok(())
    }

    fn is_cache_file(path: &Path) -> bool {
        let named = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FILE_PREFIX));
        let known_ext = path.extension().and_then(|e| e.to_str()).is_some_and(|e| {
            e == CacheFormat::Csv.extension() || e == CacheFormat::Parquet.extension()
        });
        named && known_ext
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR)
    }
}

#[async_trait]
impl SeriesCache for FileCache {
    #[instrument(skip(self, request), fields(key = %request.cache_key()))]
    async fn get(&self, request: &SeriesRequest) -> Result<Option<SeriesTable>> {
        let path = self.path_for(request);
        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Cache miss");
                return Ok(None);
            }
            Err(e) => {
                return Err(EconError::Cache(format!(
                    "cannot stat {}: {e}",
                    path.display()
                )));
            }
        }

        match Self::read_table(&path, request.format()) {
            Ok(table) => {
                debug!(path = %path.display(), series = table.len(), "Cache hit");
                Ok(Some(table))
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable cache file, treating as miss"
                );
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, request, table), fields(key = %request.cache_key(), series = table.len()))]
    async fn put(&self, request: &SeriesRequest, table: &SeriesTable) -> Result<()> {
        let path = self.path_for(request);
        self.write_table(&path, request.format(), table)?;
        debug!(path = %path.display(), "Cached series table");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(EconError::Cache(e.to_string())),
        };

        let mut removed = 0usize;
        for entry in entries {
            let path = entry.map_err(|e| EconError::Cache(e.to_string()))?.path();
            if Self::is_cache_file(&path) {
                fs::remove_file(&path).map_err(|e| EconError::Cache(e.to_string()))?;
                removed += 1;
            }
        }
        debug!("Removed {} cache files", removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use econ_core::{Frequency, Series};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_table() -> SeriesTable {
        [
            Series::from_pairs("DGS2", [(d(2024, 1, 2), 4.33), (d(2024, 1, 3), 4.25)]),
            Series::from_pairs("DGS10", [(d(2024, 1, 3), 3.91), (d(2024, 1, 4), 3.99)]),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let request = SeriesRequest::new(["DGS2", "DGS10"]).with_start(d(2024, 1, 1));

        assert!(cache.get(&request).await.unwrap().is_none());

        let table = sample_table();
        cache.put(&request, &table).await.unwrap();
        assert!(cache.path_for(&request).exists());

        let cached = cache.get(&request).await.unwrap().unwrap();
        assert_eq!(cached, table);
    }

    #[tokio::test]
    async fn test_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let request = SeriesRequest::new(["DGS2", "DGS10"])
            .with_frequency(Frequency::Monthly)
            .with_format(CacheFormat::Parquet);

        let table = sample_table();
        cache.put(&request, &table).await.unwrap();
        assert!(cache.path_for(&request).to_string_lossy().ends_with(".parquet"));

        let cached = cache.get(&request).await.unwrap().unwrap();
        assert_eq!(cached, table);
    }

    #[tokio::test]
    async fn test_reordered_request_hits_same_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        cache
            .put(&SeriesRequest::new(["DGS2", "DGS10"]), &sample_table())
            .await
            .unwrap();
        let hit = cache
            .get(&SeriesRequest::new(["DGS10", "DGS2"]))
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        let csv = SeriesRequest::new(["DFF"]);
        fs::write(cache.path_for(&csv), "not,a\ncache,file\n").unwrap();
        assert!(cache.get(&csv).await.unwrap().is_none());

        let parquet = SeriesRequest::new(["DFF"]).with_format(CacheFormat::Parquet);
        fs::write(cache.path_for(&parquet), b"\x00\x01garbage").unwrap();
        assert!(cache.get(&parquet).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));
        let request = SeriesRequest::new(["DFF"]);

        let first: SeriesTable = [Series::from_pairs("DFF", [(d(2024, 1, 2), 5.33)])]
            .into_iter()
            .collect();
        cache.put(&request, &first).await.unwrap();
        cache.put(&request, &sample_table()).await.unwrap();

        assert_eq!(cache.get(&request).await.unwrap().unwrap(), sample_table());
        let files: Vec<_> = fs::read_dir(cache.dir()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let request = SeriesRequest::new(["DFF"]);

        let first: SeriesTable = [Series::from_pairs("DFF", [(d(2024, 1, 2), 5.33)])]
            .into_iter()
            .collect();
        cache.put(&request, &first).await.unwrap();

        // A directory where the temp file should go makes the next write fail.
        let path = cache.path_for(&request);
        fs::create_dir(path.with_extension("csv.tmp")).unwrap();

        let second: SeriesTable = [Series::from_pairs("DFF", [(d(2024, 1, 2), 9.0)])]
            .into_iter()
            .collect();
        let result = cache.put(&request, &second).await;

        assert!(matches!(result, Err(EconError::Cache(_))));
        assert_eq!(cache.get(&request).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_put_into_unusable_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let cache = FileCache::new(&blocker);
        let result = cache.put(&SeriesRequest::new(["DFF"]), &sample_table()).await;
        assert!(matches!(result, Err(EconError::Cache(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_only_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        cache
            .put(&SeriesRequest::new(["DFF"]), &sample_table())
            .await
            .unwrap();
        fs::write(dir.path().join("chart.png"), b"png").unwrap();

        cache.clear().await.unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["chart.png".to_string()]);
    }
}

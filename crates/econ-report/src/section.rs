//! Report sections and image row descriptors.

use std::path::{Path, PathBuf};

/// How a run of images is arranged into rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowSpec {
    /// One image alone on its row.
    Single(PathBuf),
    /// Images split into rows of `per_row`; the last row may be shorter.
    Grouped {
        /// Images in order.
        paths: Vec<PathBuf>,
        /// Images per row.
        per_row: usize,
    },
    /// Exactly these images on one row.
    Explicit(Vec<PathBuf>),
}

impl RowSpec {
    /// One image on its own row.
    #[must_use]
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self::Single(path.into())
    }

    /// Images chunked into rows of `per_row`.
    #[must_use]
    pub fn grouped<I, P>(paths: I, per_row: usize) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::Grouped {
            paths: paths.into_iter().map(Into::into).collect(),
            per_row,
        }
    }

    /// All given images on a single row.
    #[must_use]
    pub fn row<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::Explicit(paths.into_iter().map(Into::into).collect())
    }

    /// Expands this descriptor into concrete rows. Empty rows are dropped.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<PathBuf>> {
        match self {
            Self::Single(path) => vec![vec![path.clone()]],
            Self::Grouped { paths, per_row } => paths
                .chunks((*per_row).max(1))
                .map(<[PathBuf]>::to_vec)
                .collect(),
            Self::Explicit(paths) if paths.is_empty() => Vec::new(),
            Self::Explicit(paths) => vec![paths.clone()],
        }
    }
}

/// A titled group of image rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSection {
    title: String,
    rows: Vec<RowSpec>,
}

impl ReportSection {
    /// Creates an empty section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row descriptor.
    #[must_use]
    pub fn with_row(mut self, row: RowSpec) -> Self {
        self.rows.push(row);
        self
    }

    /// Appends a single full-width image.
    #[must_use]
    pub fn with_image(self, path: impl Into<PathBuf>) -> Self {
        self.with_row(RowSpec::single(path))
    }

    /// Section title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Row descriptors in order.
    #[must_use]
    pub fn row_specs(&self) -> &[RowSpec] {
        &self.rows
    }

    /// All rows after expanding every descriptor.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<PathBuf>> {
        self.rows.iter().flat_map(RowSpec::rows).collect()
    }

    /// Every image path referenced by the section.
    pub fn images(&self) -> impl Iterator<Item = &Path> {
        self.rows.iter().flat_map(|spec| {
            let paths: &[PathBuf] = match spec {
                RowSpec::Single(path) => std::slice::from_ref(path),
                RowSpec::Grouped { paths, .. } | RowSpec::Explicit(paths) => paths,
            };
            paths.iter().map(PathBuf::as_path)
        })
    }
}

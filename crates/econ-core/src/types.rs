//! Core data types for economic time series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`SeriesId`] - Identifier of a remote series (e.g. `DFF`)
//! - [`Observation`] - A single dated value
//! - [`Series`] - Date-ordered observations for one identifier
//! - [`SeriesTable`] - Several series viewed as one outer-joined table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a remote time series.
///
/// Identifiers are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(String);

impl SeriesId {
    /// Creates a new series identifier, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeriesId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single dated value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered observations for one series.
///
/// Dates are unique and strictly increasing. When constructed from unordered
/// input, the last observation for a repeated date wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    id: SeriesId,
    observations: Vec<Observation>,
}

impl Series {
    /// Creates a series, sorting observations by date and dropping duplicate dates.
    #[must_use]
    pub fn new(id: impl Into<SeriesId>, observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut observations: Vec<Observation> = observations.into_iter().collect();
        // stable sort keeps input order within a date, so the last one is the newest
        observations.sort_by_key(|o| o.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }
        Self {
            id: id.into(),
            observations: deduped,
        }
    }

    /// Creates a series from `(date, value)` pairs.
    #[must_use]
    pub fn from_pairs(
        id: impl Into<SeriesId>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        Self::new(id, pairs.into_iter().map(|(d, v)| Observation::new(d, v)))
    }

    /// Returns the series identifier.
    #[must_use]
    pub const fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Returns the observations in date order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the value observed on `date`, if any.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| self.observations[i].value)
    }

    /// Returns the most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<Observation> {
        self.observations.last().copied()
    }

    /// Returns the date range covered by this series.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.observations.first()?.date, self.observations.last()?.date))
    }

    /// Returns a copy restricted to observations on or after `start`.
    #[must_use]
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            id: self.id.clone(),
            observations: self
                .observations
                .iter()
                .filter(|o| o.date >= start)
                .copied()
                .collect(),
        }
    }

    /// Consumes the series and returns its observations.
    #[must_use]
    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

/// One row of a [`SeriesTable`]: a date and one optional value per column.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    /// Row date.
    pub date: NaiveDate,
    /// Values in column order; `None` marks a date the series has no data for.
    pub values: Vec<Option<f64>>,
}

/// Several series combined into one table by an outer join on date.
///
/// Columns keep insertion order. Series may cover different date ranges; a
/// date missing from a series reads as `None`, never as zero and never
/// interpolated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    columns: Vec<Series>,
}

impl SeriesTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Adds a series as the last column, replacing any column with the same id in place.
    pub fn push(&mut self, series: Series) {
        match self.columns.iter_mut().find(|s| s.id() == series.id()) {
            Some(existing) => *existing = series,
            None => self.columns.push(series),
        }
    }

    /// Returns true if the table has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.columns.iter().map(Series::id)
    }

    /// Returns an iterator over the columns.
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.columns.iter()
    }

    /// Looks up a column by identifier.
    #[must_use]
    pub fn series(&self, id: &SeriesId) -> Option<&Series> {
        self.columns.iter().find(|s| s.id() == id)
    }

    /// Returns true if the table has a column for `id`.
    #[must_use]
    pub fn contains(&self, id: &SeriesId) -> bool {
        self.series(id).is_some()
    }

    /// Returns the sorted union of all column dates.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        let all: BTreeSet<NaiveDate> = self
            .columns
            .iter()
            .flat_map(|s| s.observations().iter().map(|o| o.date))
            .collect();
        all.into_iter().collect()
    }

    /// Returns true if any column has an observation on `date`.
    #[must_use]
    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.columns.iter().any(|s| s.value_at(date).is_some())
    }

    /// Returns the value of `id` on `date`.
    #[must_use]
    pub fn value(&self, id: &SeriesId, date: NaiveDate) -> Option<f64> {
        self.series(id)?.value_at(date)
    }

    /// Returns the most recent observation of `id`.
    #[must_use]
    pub fn last_valid(&self, id: &SeriesId) -> Option<Observation> {
        self.series(id)?.last()
    }

    /// Materializes the outer join as rows.
    #[must_use]
    pub fn rows(&self) -> Vec<TableRow> {
        self.dates()
            .into_iter()
            .map(|date| TableRow {
                date,
                values: self.columns.iter().map(|s| s.value_at(date)).collect(),
            })
            .collect()
    }

    /// Returns a copy with every column restricted to dates on or after `start`.
    #[must_use]
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            columns: self.columns.iter().map(|s| s.since(start)).collect(),
        }
    }
}

impl FromIterator<Series> for SeriesTable {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut table = Self::new();
        for series in iter {
            table.push(series);
        }
        table
    }
}

impl IntoIterator for SeriesTable {
    type Item = Series;
    type IntoIter = std::vec::IntoIter<Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

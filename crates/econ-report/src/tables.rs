//! Cell data for the comparison and cumulative-change tables.

use chrono::NaiveDate;
use econ_core::{EconError, Result, SeriesId, SeriesTable};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Cell for a reference date whose value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Cell for a reference date absent from the table.
pub const DATE_NOT_FOUND: &str = "Date not found";

/// Labels for the FRED policy-rate and Treasury series used in rate reports.
const FRED_LABELS: [(&str, &str); 7] = [
    ("DFF", "Federal Funds Effective Rate"),
    ("DGS3MO", "3-month Treasury Bill"),
    ("DGS1", "1-Year Treasury Yield"),
    ("DGS2", "2-Year Treasury Yield"),
    ("DGS5", "5-Year Treasury Yield"),
    ("DGS7", "7-Year Treasury Yield"),
    ("DGS10", "10-Year Treasury Yield"),
];

/// Human-readable labels for series identifiers.
///
/// Unknown identifiers display as themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayNames(HashMap<SeriesId, String>);

impl DisplayNames {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for the federal funds rate and the Treasury curve (`DFF`, `DGS3MO`, `DGS1` .. `DGS10`).
    #[must_use]
    pub fn fred_defaults() -> Self {
        FRED_LABELS.into_iter().collect()
    }

    /// Adds a label.
    #[must_use]
    pub fn with(mut self, id: impl Into<SeriesId>, name: impl Into<String>) -> Self {
        self.insert(id, name);
        self
    }

    /// Adds or replaces a label.
    pub fn insert(&mut self, id: impl Into<SeriesId>, name: impl Into<String>) {
        self.0.insert(id.into(), name.into());
    }

    /// Label for `id`, falling back to the identifier.
    #[must_use]
    pub fn get<'a>(&'a self, id: &'a SeriesId) -> &'a str {
        self.0.get(id).map_or(id.as_str(), String::as_str)
    }
}

impl<K: Into<SeriesId>, V: Into<String>> FromIterator<(K, V)> for DisplayNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        )
    }
}

/// A table of preformatted text cells, ready for a [`TableRenderer`](crate::TableRenderer).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextTable {
    /// Optional caption.
    pub title: Option<String>,
    /// Column headers.
    pub headers: Vec<String>,
    /// Rows of cells, each as long as `headers`.
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Sets the caption.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn fmt_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Latest value of each series and its change against reference dates.
///
/// Columns are `Series`, `Current Value` and one `Chg. vs. MM-DD` per date.
/// A reference date outside the table's index yields [`DATE_NOT_FOUND`]; a date
/// present in the index where this series has no value yields [`NOT_AVAILABLE`].
/// Series that are absent or empty are skipped.
#[must_use]
pub fn comparison_table(
    table: &SeriesTable,
    series: &[SeriesId],
    custom_dates: &[NaiveDate],
    names: &DisplayNames,
) -> TextTable {
    let mut headers = vec!["Series".to_string(), "Current Value".to_string()];
    headers.extend(
        custom_dates
            .iter()
            .map(|date| format!("Chg. vs. {}", date.format("%m-%d"))),
    );

    let mut rows = Vec::with_capacity(series.len());
    for id in series {
        if !table.contains(id) {
            warn!(series = %id, "Series not in table, skipping");
            continue;
        }
        let Some(current) = table.last_valid(id) else {
            debug!(series = %id, "Series has no data, skipping");
            continue;
        };

        let mut row = vec![names.get(id).to_string(), fmt_value(current.value)];
        for date in custom_dates {
            let cell = if !table.has_date(*date) {
                DATE_NOT_FOUND.to_string()
            } else {
                table
                    .value(id, *date)
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |v| fmt_value(current.value - v))
            };
            row.push(cell);
        }
        rows.push(row);
    }

    TextTable {
        title: None,
        headers,
        rows,
    }
}

/// Day-by-day values of one series from `start`, with cumulative and daily changes.
///
/// Columns are `Date` (`MM-DD`), `Value`, `Chg. vs. MM-DD` and `Daily Change`.
/// Only dates with a value are listed; the first row has no daily change.
///
/// # Errors
/// Returns [`EconError::DataNotAvailable`] if the series has no value on `start`.
pub fn analysis_table(
    table: &SeriesTable,
    series: &SeriesId,
    start: NaiveDate,
    names: &DisplayNames,
) -> Result<TextTable> {
    let data = table
        .series(series)
        .ok_or_else(|| EconError::SeriesNotFound(series.to_string()))?
        .since(start);

    let Some(start_value) = data.value_at(start) else {
        return Err(EconError::DataNotAvailable {
            series: series.to_string(),
            start: start.to_string(),
        });
    };

    let headers = vec![
        "Date".to_string(),
        "Value".to_string(),
        format!("Chg. vs. {}", start.format("%m-%d")),
        "Daily Change".to_string(),
    ];

    let mut previous: Option<f64> = None;
    let rows = data
        .observations()
        .iter()
        .map(|obs| {
            let daily = previous.map_or_else(|| NOT_AVAILABLE.to_string(), |p| fmt_value(obs.value - p));
            previous = Some(obs.value);
            vec![
                obs.date.format("%m-%d").to_string(),
                fmt_value(obs.value),
                fmt_value(obs.value - start_value),
                daily,
            ]
        })
        .collect();

    Ok(TextTable {
        title: Some(names.get(series).to_string()),
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_core::Series;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn sample() -> SeriesTable {
        [
            Series::from_pairs("DGS10", [(d(1, 2), 3.95), (d(1, 3), 3.91), (d(1, 4), 3.99)]),
            Series::from_pairs("DGS2", [(d(1, 3), 4.33), (d(1, 4), 4.38)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_display_names_fallback() {
        let names = DisplayNames::new().with("DGS10", "10-Year Treasury");
        assert_eq!(names.get(&SeriesId::new("dgs10")), "10-Year Treasury");
        assert_eq!(names.get(&SeriesId::new("DGS2")), "DGS2");
    }

    #[test]
    fn test_fred_default_names() {
        let names = DisplayNames::fred_defaults().with("DGS2", "2Y");
        assert_eq!(names.get(&SeriesId::new("DFF")), "Federal Funds Effective Rate");
        assert_eq!(names.get(&SeriesId::new("DGS3MO")), "3-month Treasury Bill");
        assert_eq!(names.get(&SeriesId::new("DGS10")), "10-Year Treasury Yield");
        assert_eq!(names.get(&SeriesId::new("DGS2")), "2Y");
        assert_eq!(names.get(&SeriesId::new("T10Y2Y")), "T10Y2Y");
    }

    #[test]
    fn test_comparison_table_cells() {
        let names: DisplayNames = [("DGS10", "10Y")].into_iter().collect();
        let ids = [SeriesId::new("DGS10"), SeriesId::new("DGS2"), SeriesId::new("T10Y2Y")];
        let result = comparison_table(&sample(), &ids, &[d(1, 2), d(1, 3), d(6, 1)], &names);

        assert_eq!(
            result.headers,
            ["Series", "Current Value", "Chg. vs. 01-02", "Chg. vs. 01-03", "Chg. vs. 06-01"]
        );
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], ["10Y", "3.99", "0.04", "0.08", DATE_NOT_FOUND]);
        assert_eq!(result.rows[1], ["DGS2", "4.38", NOT_AVAILABLE, "0.05", DATE_NOT_FOUND]);
    }

    #[test]
    fn test_analysis_table_rows() {
        let result =
            analysis_table(&sample(), &SeriesId::new("DGS10"), d(1, 3), &DisplayNames::new())
                .unwrap();

        assert_eq!(result.title.as_deref(), Some("DGS10"));
        assert_eq!(result.headers[2], "Chg. vs. 01-03");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], ["01-03", "3.91", "0.00", NOT_AVAILABLE]);
        assert_eq!(result.rows[1], ["01-04", "3.99", "0.08", "0.08"]);
    }

    #[test]
    fn test_analysis_table_requires_start_value() {
        let result =
            analysis_table(&sample(), &SeriesId::new("DGS2"), d(1, 2), &DisplayNames::new());
        assert!(matches!(result, Err(EconError::DataNotAvailable { .. })));

        let missing =
            analysis_table(&sample(), &SeriesId::new("DFF"), d(1, 2), &DisplayNames::new());
        assert!(matches!(missing, Err(EconError::SeriesNotFound(_))));
    }
}

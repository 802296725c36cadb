//! Interfaces for the chart and table rasterizers that produce report images.

use crate::tables::{DisplayNames, NOT_AVAILABLE, TextTable};
use chrono::NaiveDate;
use econ_core::{Result, SeriesId, SeriesTable};
use std::path::{Path, PathBuf};

/// Presentation options for a line chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartOptions {
    /// Chart title. Defaults to the display name of the first series.
    pub title: Option<String>,
    /// Only data on or after this date is plotted.
    pub start: Option<NaiveDate>,
    /// Legend labels.
    pub labels: DisplayNames,
    /// Dates marked with vertical lines.
    pub vlines: Vec<NaiveDate>,
    /// Annotate the last point of each series with its value.
    pub show_last_value: bool,
    /// Draw a small value table under the chart.
    pub show_table: bool,
    /// Extra dates listed in the value table.
    pub custom_dates: Vec<NaiveDate>,
}

impl ChartOptions {
    /// Title to draw for a chart of `series`.
    #[must_use]
    pub fn resolved_title(&self, series: &[SeriesId]) -> String {
        match (&self.title, series.first()) {
            (Some(title), _) => title.clone(),
            (None, Some(first)) => self.labels.get(first).to_string(),
            (None, None) => String::new(),
        }
    }

    /// Data window selected by [`start`](Self::start).
    #[must_use]
    pub fn window(&self, table: &SeriesTable) -> SeriesTable {
        match self.start {
            Some(start) => table.since(start),
            None => table.clone(),
        }
    }

    /// Cells of the value table drawn under a chart of `series`.
    ///
    /// Lists the last observation of the last series, then its value on each
    /// custom date.
    #[must_use]
    pub fn value_table(&self, table: &SeriesTable, series: &[SeriesId]) -> TextTable {
        let headers = vec!["Date".to_string(), "Value".to_string()];
        let Some(id) = series.last() else {
            return TextTable {
                headers,
                ..TextTable::default()
            };
        };
        let data = self.window(table);

        let mut rows = vec![match data.last_valid(id) {
            Some(obs) => vec![obs.date.to_string(), format!("{:.2}", obs.value)],
            None => vec!["No Data".to_string(), NOT_AVAILABLE.to_string()],
        }];
        rows.extend(self.custom_dates.iter().map(|date| {
            let value = data
                .value(id, *date)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"));
            vec![date.to_string(), value]
        }));

        TextTable {
            title: None,
            headers,
            rows,
        }
    }
}

/// Rasterizes line charts of table columns to image files.
pub trait ChartRenderer {
    /// Draws `series` from `table` and writes the image to `path`.
    ///
    /// Returns the path of the written image.
    fn render_chart(
        &self,
        table: &SeriesTable,
        series: &[SeriesId],
        options: &ChartOptions,
        path: &Path,
    ) -> Result<PathBuf>;
}

/// Rasterizes text tables to image files.
pub trait TableRenderer {
    /// Draws `table` and writes the image to `path`.
    ///
    /// Returns the path of the written image.
    fn render_table(&self, table: &TextTable, path: &Path) -> Result<PathBuf>;
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
            Series::from_pairs("DGS2", [(d(1, 2), 4.33), (d(1, 3), 4.25)]),
            Series::from_pairs("DGS10", [(d(1, 2), 3.95), (d(1, 4), 3.99)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolved_title() {
        let ids = [SeriesId::new("DGS10")];
        let options = ChartOptions {
            labels: DisplayNames::new().with("DGS10", "10-Year Treasury"),
            ..ChartOptions::default()
        };
        assert_eq!(options.resolved_title(&ids), "10-Year Treasury");

        let titled = ChartOptions {
            title: Some("Yields".to_string()),
            ..options
        };
        assert_eq!(titled.resolved_title(&ids), "Yields");
    }

    #[test]
    fn test_value_table_uses_last_series() {
        let options = ChartOptions {
            start: Some(d(1, 3)),
            custom_dates: vec![d(1, 2), d(1, 4)],
            show_table: true,
            ..ChartOptions::default()
        };
        let ids = [SeriesId::new("DGS2"), SeriesId::new("DGS10")];
        let cells = options.value_table(&sample(), &ids);

        assert_eq!(cells.rows[0], ["2024-01-04", "3.99"]);
        // 01-02 falls before the chart window.
        assert_eq!(cells.rows[1], ["2024-01-02", NOT_AVAILABLE]);
        assert_eq!(cells.rows[2], ["2024-01-04", "3.99"]);
    }
}

//! Conversions between [`SeriesTable`] and polars [`DataFrame`].
//!
//! The frame layout is one `date` column (polars `Date`) followed by one
//! nullable `f64` column per series, in table order. Rows are the outer join
//! of all series dates.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::error::{EconError, Result};
use crate::types::{Observation, Series, SeriesTable};

/// Name of the date column in cached frames.
pub const DATE_COLUMN: &str = "date";

/// Days from 0001-01-01 to 1970-01-01; polars dates count from the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn parse_err(e: PolarsError) -> EconError {
    EconError::Parse(e.to_string())
}

/// Builds an outer-joined frame from a table.
///
/// # Errors
/// Returns an error if polars rejects the columns.
pub fn table_to_frame(table: &SeriesTable) -> Result<DataFrame> {
    let dates = table.dates();
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();

    let mut columns = Vec::with_capacity(table.len() + 1);
    columns.push(
        Column::new(DATE_COLUMN.into(), days)
            .cast(&DataType::Date)
            .map_err(|e| EconError::Other(e.to_string()))?,
    );
    for series in table.iter() {
        let values: Vec<Option<f64>> = dates.iter().map(|d| series.value_at(*d)).collect();
        columns.push(Column::new(series.id().as_str().into(), values));
    }

    DataFrame::new(columns).map_err(|e| EconError::Other(e.to_string()))
}

/// Reads a table back from a frame in the layout produced by [`table_to_frame`].
///
/// The date column may be a polars `Date` (binary formats) or ISO `YYYY-MM-DD`
/// strings (text formats). Null cells are dropped; they are gaps, not values.
///
/// # Errors
/// Returns [`EconError::Parse`] if the date column is missing or malformed, or a
/// value column is not numeric.
pub fn frame_to_table(df: &DataFrame) -> Result<SeriesTable> {
    let dates = frame_dates(df)?;

    let mut table = SeriesTable::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == DATE_COLUMN {
            continue;
        }
        let values = column.strict_cast(&DataType::Float64).map_err(parse_err)?;
        let values = values.as_materialized_series().f64().map_err(parse_err)?;
        let observations: Vec<Observation> = dates
            .iter()
            .zip(values.into_iter())
            .filter_map(|(date, value)| value.map(|v| Observation::new(*date, v)))
            .collect();
        table.push(Series::new(name, observations));
    }

    Ok(table)
}

fn frame_dates(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let column = df.column(DATE_COLUMN).map_err(parse_err)?;
    match column.dtype() {
        DataType::Date => {
            let days = column.cast(&DataType::Int32).map_err(parse_err)?;
            let days = days.as_materialized_series().i32().map_err(parse_err)?;
            days.into_iter()
                .map(|d| {
                    d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                        .ok_or_else(|| EconError::Parse("null or out-of-range date".to_string()))
                })
                .collect()
        }
        DataType::String => {
            let text = column.as_materialized_series().str().map_err(parse_err)?;
            text.into_iter()
                .map(|d| {
                    let d = d.ok_or_else(|| EconError::Parse("null date".to_string()))?;
                    NaiveDate::parse_from_str(d, "%Y-%m-%d")
                        .map_err(|e| EconError::Parse(format!("bad date '{d}': {e}")))
                })
                .collect()
        }
        other => Err(EconError::Parse(format!(
            "unexpected date column type {other}"
        ))),
    }
}

//! Observation frequency and downsampling.
//!
//! This module defines [`Frequency`] for the granularity a caller wants a series
//! in, and [`resample`] which aggregates a series into periodic means.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EconError;
use crate::types::{Observation, Series};

/// Requested frequency of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Whatever the source publishes; no resampling.
    #[default]
    Native,
    /// Calendar-month means, dated at month end.
    Monthly,
    /// Calendar-quarter means, dated at quarter end.
    Quarterly,
    /// Calendar-year means, dated December 31.
    Annual,
}

impl Frequency {
    /// Short code used in cache keys and on the command line.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Monthly => "m",
            Self::Quarterly => "q",
            Self::Annual => "a",
        }
    }

    /// Returns the last day of the period containing `date`.
    ///
    /// Returns `None` for [`Frequency::Native`], which has no periods.
    #[must_use]
    pub fn period_end(&self, date: NaiveDate) -> Option<NaiveDate> {
        let last_month = match self {
            Self::Native => return None,
            Self::Monthly => date.month(),
            Self::Quarterly => ((date.month() - 1) / 3 + 1) * 3,
            Self::Annual => 12,
        };
        month_end(date.year(), last_month)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = EconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "native" | "d" => Ok(Self::Native),
            "m" | "monthly" => Ok(Self::Monthly),
            "q" | "quarterly" => Ok(Self::Quarterly),
            "a" | "y" | "annual" => Ok(Self::Annual),
            other => Err(EconError::InvalidParameter(format!(
                "unknown frequency '{other}'"
            ))),
        }
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Downsamples `series` to `frequency` by taking the mean of each period.
///
/// Periods without observations produce no output point. [`Frequency::Native`]
/// returns the series unchanged; this never upsamples.
#[must_use]
pub fn resample(series: &Series, frequency: Frequency) -> Series {
    if frequency == Frequency::Native {
        return series.clone();
    }

    let mut out: Vec<Observation> = Vec::new();
    let mut current: Option<(NaiveDate, f64, usize)> = None;

    // observations are date-ordered, so each period is one contiguous run
    for obs in series.observations() {
        let Some(end) = frequency.period_end(obs.date) else {
            continue;
        };
        if let Some((period, sum, count)) = current.as_mut() {
            if *period == end {
                *sum += obs.value;
                *count += 1;
                continue;
            }
        }
        if let Some((period, sum, count)) = current.take() {
            out.push(Observation::new(period, sum / count as f64));
        }
        current = Some((end, obs.value, 1));
    }
    if let Some((period, sum, count)) = current {
        out.push(Observation::new(period, sum / count as f64));
    }

    Series::new(series.id().clone(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_mean_of_february() {
        let series = Series::from_pairs("DFF", (1..=28).map(|i| (d(2021, 2, i), f64::from(i))));
        let monthly = resample(&series, Frequency::Monthly);

        assert_eq!(monthly.len(), 1);
        let obs = monthly.observations()[0];
        assert_eq!(obs.date, d(2021, 2, 28));
        assert!((obs.value - 14.5).abs() < 1e-12);
    }

    #[test]
    fn test_quarterly_and_annual_period_ends() {
        assert_eq!(Frequency::Quarterly.period_end(d(2024, 5, 9)), Some(d(2024, 6, 30)));
        assert_eq!(Frequency::Quarterly.period_end(d(2024, 12, 1)), Some(d(2024, 12, 31)));
        assert_eq!(Frequency::Annual.period_end(d(2024, 2, 29)), Some(d(2024, 12, 31)));
        assert_eq!(Frequency::Monthly.period_end(d(2024, 2, 3)), Some(d(2024, 2, 29)));
        assert_eq!(Frequency::Native.period_end(d(2024, 2, 3)), None);
    }

    #[test]
    fn test_resample_skips_empty_periods() {
        let series = Series::from_pairs(
            "DGS10",
            [(d(2024, 1, 2), 4.0), (d(2024, 1, 3), 2.0), (d(2024, 3, 1), 5.0)],
        );
        let monthly = resample(&series, Frequency::Monthly);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly.value_at(d(2024, 1, 31)), Some(3.0));
        assert_eq!(monthly.value_at(d(2024, 3, 31)), Some(5.0));
    }

    #[test]
    fn test_native_is_identity() {
        let series = Series::from_pairs("DFF", [(d(2024, 1, 2), 4.0)]);
        assert_eq!(resample(&series, Frequency::Native), series);
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!("m".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("Quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert!("weekly".parse::<Frequency>().is_err());
    }
}

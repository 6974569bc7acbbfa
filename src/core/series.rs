//! Monthly-indexed series with a synthesized calendar axis.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate};

/// Month-end date for the month `offset` months after the month of `anchor`.
///
/// Follows the pandas `freq='M'` convention: the index point for a month is
/// its last calendar day, and the first point is the month-end of the start
/// date's own month.
pub fn month_end_after(anchor: NaiveDate, offset: usize) -> Result<NaiveDate> {
    let months = anchor.month0() as i64 + offset as i64;
    let year = anchor.year() as i64 + months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;

    let year = i32::try_from(year)
        .map_err(|_| AnalysisError::Timestamp(format!("calendar overflow at offset {offset}")))?;

    // Last day of (year, month) = day before the first of the next month.
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AnalysisError::Timestamp(format!("calendar overflow at offset {offset}")))
}

/// A univariate time series on a strictly increasing monthly index.
///
/// The index is always synthesized, never read from input: one month-end
/// timestamp per observation, starting at a user-chosen date.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Create a series from explicit timestamps and values.
    ///
    /// Timestamps must be strictly increasing and match the value count.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(AnalysisError::Timestamp(format!(
                "index length {} does not match value count {}",
                timestamps.len(),
                values.len()
            )));
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(AnalysisError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Build a series by assigning a synthetic month-end index to `values`,
    /// starting at the month of `start`.
    pub fn from_start(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalysisError::InsufficientData { needed: 1, got: 0 });
        }
        let timestamps = (0..values.len())
            .map(|i| month_end_after(start, i))
            .collect::<Result<Vec<_>>>()?;
        Self::new(timestamps, values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observation values in index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Month-end timestamps in index order.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Last timestamp of the series.
    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.last().copied()
    }

    /// Month-end timestamps for the `horizon` months immediately after the
    /// series, continuing the monthly index without gaps.
    pub fn future_index(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let last = self
            .last_timestamp()
            .ok_or(AnalysisError::InsufficientData { needed: 1, got: 0 })?;
        (1..=horizon).map(|i| month_end_after(last, i)).collect()
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

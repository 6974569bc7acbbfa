//! Forecast table: ordered point predictions on the future monthly index.

use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;

/// An ordered sequence of `(timestamp, predicted value)` pairs.
///
/// Timestamps continue the monthly index immediately after the last
/// observation of the input series; the sequence length equals the
/// requested horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ForecastTable {
    /// Create a forecast table; timestamp and value counts must match.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(AnalysisError::Timestamp(format!(
                "forecast index length {} does not match value count {}",
                timestamps.len(),
                values.len()
            )));
        }
        Ok(Self { timestamps, values })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Whether the table holds no predictions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Predicted values in step order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Forecast timestamps in step order.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Serialize to CSV with a `timestamp,forecast` header row.
    ///
    /// This is the exact payload offered for download as `previsao.csv`.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["timestamp", "forecast"])
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;
        for (ts, value) in self.iter() {
            writer
                .write_record([ts.to_string(), value.to_string()])
                .map_err(|e| AnalysisError::Parse(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AnalysisError::Parse(e.to_string()))
    }
}

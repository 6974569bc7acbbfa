//! Classical additive seasonal decomposition.
//!
//! Splits a series into trend, seasonal, and residual components:
//! trend is a centered moving average over one seasonal cycle, seasonal is
//! the mean detrended deviation per cycle position (re-centered to sum to
//! zero), and residual is what remains. Positions where the centered
//! window does not fit hold `NaN`, mirroring the usual convention.

use crate::error::{AnalysisError, Result};

/// Components of an additive decomposition, index-aligned with the input.
///
/// `trend` and `residual` are `NaN` for the half-window at each end of the
/// series; `seasonal` is defined everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Centered moving-average trend.
    pub trend: Vec<f64>,
    /// Repeating seasonal component, one value per cycle position.
    pub seasonal: Vec<f64>,
    /// Observed minus trend minus seasonal.
    pub residual: Vec<f64>,
}

/// Decompose `values` additively with the given seasonal period.
///
/// Requires at least two full seasonal cycles of data.
pub fn seasonal_decompose(values: &[f64], period: usize) -> Result<Decomposition> {
    if period == 0 {
        return Err(AnalysisError::InvalidParameter(
            "seasonal period must be at least 1".to_string(),
        ));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(AnalysisError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }

    let trend = centered_moving_average(values, period);

    // Mean detrended deviation per cycle position, ignoring NaN edges.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (&y, &t)) in values.iter().zip(trend.iter()).enumerate() {
        if t.is_finite() {
            sums[i % period] += y - t;
            counts[i % period] += 1;
        }
    }
    let mut cycle: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    // Re-center so the seasonal component sums to zero over one cycle.
    let mean = cycle.iter().sum::<f64>() / period as f64;
    for value in &mut cycle {
        *value -= mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| cycle[i % period]).collect();
    let residual: Vec<f64> = values
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((&y, &t), &s)| y - t - s)
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average over one seasonal cycle.
///
/// For an even period the window spans `period + 1` points with half
/// weights at both ends, so the average stays centered on an index point.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut trend = vec![f64::NAN; n];

    if period % 2 == 0 {
        let half = period / 2;
        for i in half..n.saturating_sub(half) {
            let mut acc = 0.5 * (values[i - half] + values[i + half]);
            for j in (i - half + 1)..(i + half) {
                acc += values[j];
            }
            trend[i] = acc / period as f64;
        }
    } else {
        let half = (period - 1) / 2;
        for i in half..n - half {
            let acc: f64 = values[i - half..=i + half].iter().sum();
            trend[i] = acc / period as f64;
        }
    }

    trend
}

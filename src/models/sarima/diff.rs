//! Differencing and integration for the SARIMA model.
//!
//! Fitting works on the series after `D` seasonal differences followed by
//! `d` regular differences; forecasts are integrated back in the opposite
//! order.

/// Apply `d` rounds of first differencing.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply `d` rounds of lag-`period` seasonal differencing.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            break;
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Undo `d` rounds of first differencing for values that continue `history`.
///
/// `history` is the undifferenced series the forecast follows; each level's
/// cumulative sum is anchored at the last value of the history differenced
/// to that level.
pub fn integrate(differenced: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }
    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let base = difference(history, level);
        let mut acc = base.last().copied().unwrap_or(0.0);
        for value in &mut result {
            acc += *value;
            *value = acc;
        }
    }
    result
}

/// Undo `d` rounds of seasonal differencing for values that continue
/// `history`, reusing freshly integrated values once the forecast extends
/// past one period.
pub fn seasonal_integrate(
    differenced: &[f64],
    history: &[f64],
    d: usize,
    period: usize,
) -> Vec<f64> {
    if d == 0 || period == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }
    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let mut extended = seasonal_difference(history, level, period);
        if extended.len() < period {
            break;
        }
        for &delta in &result {
            let prev = extended[extended.len() - period];
            extended.push(prev + delta);
        }
        let tail = extended.len() - result.len();
        result = extended.split_off(tail);
    }
    result
}

//! Forecaster trait defining the model interface used by the pipeline.

use crate::core::MonthlySeries;
use crate::error::Result;

/// Common interface for forecasting models.
///
/// Object-safe, so the pipeline could hold a `Box<dyn Forecaster>` if more
/// models were added. Predictions are plain values; the caller pairs them
/// with the future monthly index.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &MonthlySeries) -> Result<()>;

    /// Point predictions for the next `horizon` steps.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample one-step predictions on the fitting scale, when available.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual minus fitted) on the fitting scale.
    fn residuals(&self) -> Option<&[f64]>;

    /// Display name of the model.
    fn name(&self) -> &str;

    /// Whether the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

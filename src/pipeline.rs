//! The modeling stage: one synchronous run from raw values to report.
//!
//! Every failure inside the run is surfaced as a single [`AnalysisError`];
//! callers either get the complete report or nothing.

use crate::config::AnalysisConfig;
use crate::core::{ForecastTable, MonthlySeries};
use crate::decompose::{seasonal_decompose, Decomposition};
use crate::error::Result;
use crate::models::sarima::Sarima;
use crate::models::Forecaster;

/// Everything the presentation stage renders for one successful run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// The uploaded values on their synthesized monthly index.
    pub series: MonthlySeries,
    /// Additive decomposition of the series.
    pub decomposition: Decomposition,
    /// Point forecast for the requested horizon.
    pub forecast: ForecastTable,
    /// Soft warning when the optimizer stopped before its tolerance.
    pub fit_warning: Option<String>,
}

/// Run the full pipeline: index synthesis, decomposition, SARIMA fit,
/// forecast. Always additive, always monthly; neither is configurable.
pub fn run_analysis(values: &[f64], config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let series = MonthlySeries::from_start(config.start, values.to_vec())?;
    let decomposition = seasonal_decompose(values, config.period)?;

    let mut model = Sarima::new(config.order());
    model.fit(&series)?;

    let predictions = model.predict(config.horizon)?;
    let timestamps = series.future_index(config.horizon)?;
    let forecast = ForecastTable::new(timestamps, predictions)?;

    let fit_warning = if model.converged() {
        None
    } else {
        Some(
            "Model estimation stopped before full convergence; the forecast \
             uses the best parameters found."
                .to_string(),
        )
    };

    tracing::debug!(
        points = series.len(),
        horizon = forecast.horizon(),
        converged = model.converged(),
        "analysis run complete"
    );

    Ok(AnalysisReport {
        series,
        decomposition,
        forecast,
        fit_warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use chrono::NaiveDate;

    fn monthly_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                500.0
                    + 2.0 * i as f64
                    + 60.0 * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin()
            })
            .collect()
    }

    #[test]
    fn default_run_produces_all_three_artifacts() {
        let values = monthly_signal(36);
        let report = run_analysis(&values, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.series.len(), 36);
        assert_eq!(report.decomposition.trend.len(), 36);
        assert_eq!(report.forecast.horizon(), 12);

        // Forecast starts one month after the last observation.
        let last = report.series.last_timestamp().unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2002, 12, 31).unwrap());
        assert_eq!(
            report.forecast.timestamps()[0],
            NaiveDate::from_ymd_opt(2003, 1, 31).unwrap()
        );
    }

    #[test]
    fn too_few_points_for_the_season_fail_early() {
        let values = monthly_signal(10);
        let result = run_analysis(&values, &AnalysisConfig::default());
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { needed: 24, got: 10 })
        ));
    }

    #[test]
    fn out_of_range_horizon_is_rejected_before_any_work() {
        let values = monthly_signal(36);
        let mut config = AnalysisConfig::default();
        config.horizon = 0;
        assert!(matches!(
            run_analysis(&values, &config),
            Err(AnalysisError::InvalidParameter(_))
        ));

        config.horizon = 49;
        assert!(matches!(
            run_analysis(&values, &config),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn identical_runs_yield_identical_forecasts() {
        let values = monthly_signal(48);
        let config = AnalysisConfig::default();
        let first = run_analysis(&values, &config).unwrap();
        let second = run_analysis(&values, &config).unwrap();
        assert_eq!(first.forecast, second.forecast);
    }
}

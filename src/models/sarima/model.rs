//! Seasonal ARIMA model estimated by conditional sum of squares.

use crate::core::MonthlySeries;
use crate::error::{AnalysisError, Result};
use crate::models::sarima::diff::{
    difference, integrate, seasonal_difference, seasonal_integrate,
};
use crate::models::Forecaster;
use crate::utils::optimization::{minimize_simplex, SimplexOptions};

/// Seasonal part of a SARIMA order: (P, D, Q) at lag `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalSpec {
    /// Seasonal AR order (P).
    pub p: usize,
    /// Seasonal differencing order (D).
    pub d: usize,
    /// Seasonal MA order (Q).
    pub q: usize,
    /// Seasonal period (s).
    pub period: usize,
}

impl SeasonalSpec {
    /// Create a new seasonal specification.
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }
}

/// Full SARIMA(p, d, q)(P, D, Q)\[s\] specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaSpec {
    /// Non-seasonal AR order (p).
    pub p: usize,
    /// Non-seasonal differencing order (d).
    pub d: usize,
    /// Non-seasonal MA order (q).
    pub q: usize,
    /// Seasonal component.
    pub seasonal: SeasonalSpec,
}

impl SarimaSpec {
    /// Create a new SARIMA specification.
    pub fn new(p: usize, d: usize, q: usize, seasonal: SeasonalSpec) -> Self {
        Self { p, d, q, seasonal }
    }

    /// Total number of estimated parameters (coefficients plus intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.seasonal.p + self.seasonal.q + 1
    }

    /// Deepest lag the recursion reaches back to on the differenced scale.
    pub fn max_lag(&self) -> usize {
        let s = self.seasonal.period;
        self.p
            .max(self.q)
            .max(self.seasonal.p * s)
            .max(self.seasonal.q * s)
    }
}

impl Default for SarimaSpec {
    /// The form default: SARIMA(2, 0, 0)(0, 1, 1)\[12\].
    fn default() -> Self {
        Self::new(2, 0, 0, SeasonalSpec::new(0, 1, 1, 12))
    }
}

/// Estimated SARIMA coefficients, kept together so the CSS objective and
/// the forecast recursion share one evaluation routine.
#[derive(Debug, Clone, Default)]
struct Coefficients {
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

impl Coefficients {
    fn from_flat(params: &[f64], spec: &SarimaSpec) -> Self {
        let (p, q, sp) = (spec.p, spec.q, spec.seasonal.p);
        Self {
            intercept: params[0],
            ar: params[1..1 + p].to_vec(),
            ma: params[1 + p..1 + p + q].to_vec(),
            seasonal_ar: params[1 + p + q..1 + p + q + sp].to_vec(),
            seasonal_ma: params[1 + p + q + sp..].to_vec(),
        }
    }

    /// One-step prediction at index `t`, given the series so far and the
    /// residuals of earlier steps. Seasonal and non-seasonal lag terms are
    /// combined additively.
    fn predict_at(&self, series: &[f64], residuals: &[f64], t: usize, period: usize) -> f64 {
        let c = self.intercept;
        let mut pred = c;
        for (i, &phi) in self.ar.iter().enumerate() {
            if t > i {
                pred += phi * (series[t - 1 - i] - c);
            }
        }
        for (j, &phi) in self.seasonal_ar.iter().enumerate() {
            let lag = (j + 1) * period;
            if t >= lag {
                pred += phi * (series[t - lag] - c);
            }
        }
        for (i, &theta) in self.ma.iter().enumerate() {
            if t > i {
                pred += theta * residuals[t - 1 - i];
            }
        }
        for (j, &theta) in self.seasonal_ma.iter().enumerate() {
            let lag = (j + 1) * period;
            if t >= lag {
                pred += theta * residuals[t - lag];
            }
        }
        pred
    }
}

/// SARIMA forecasting model.
///
/// Fits by conditional-sum-of-squares minimization on the doubly
/// differenced series. Optimizer non-convergence is a soft condition: the
/// fit completes with the best parameters found and [`Sarima::converged`]
/// reports `false`, matching the "fit without raising" default of the
/// statistics libraries this mirrors.
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: SarimaSpec,
    coefficients: Coefficients,
    /// Original observations, for seasonal integration.
    history: Option<Vec<f64>>,
    /// Seasonally differenced history, for regular integration.
    seasonal_diffed: Option<Vec<f64>>,
    /// Fully differenced series the recursion runs on.
    work: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    converged: bool,
}

impl Sarima {
    /// Create an unfitted model with the given specification.
    pub fn new(spec: SarimaSpec) -> Self {
        Self {
            spec,
            coefficients: Coefficients::default(),
            history: None,
            seasonal_diffed: None,
            work: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
            converged: true,
        }
    }

    /// The model specification.
    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    /// Whether the last fit reached the optimizer's tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Non-seasonal AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.coefficients.ar
    }

    /// Non-seasonal MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// Seasonal AR coefficients.
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.coefficients.seasonal_ar
    }

    /// Seasonal MA coefficients.
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.coefficients.seasonal_ma
    }

    /// Intercept on the differenced scale.
    pub fn intercept(&self) -> f64 {
        self.coefficients.intercept
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion of the fit.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    fn css(work: &[f64], spec: &SarimaSpec, coefficients: &Coefficients) -> f64 {
        let n = work.len();
        let start = spec.max_lag();
        if n <= start {
            return f64::MAX;
        }
        let period = spec.seasonal.period.max(1);
        let mut residuals = vec![0.0; n];
        let mut total = 0.0;
        for t in start..n {
            let error = work[t] - coefficients.predict_at(work, &residuals, t, period);
            residuals[t] = error;
            total += error * error;
        }
        total
    }

    fn estimate(&mut self, work: &[f64]) -> Result<()> {
        let spec = self.spec;
        let mean = work.iter().sum::<f64>() / work.len() as f64;
        let n_coeffs = spec.num_params() - 1;

        if n_coeffs == 0 {
            // Intercept-only model: the CSS optimum is the mean.
            self.coefficients = Coefficients {
                intercept: mean,
                ..Coefficients::default()
            };
            self.converged = true;
            return Ok(());
        }

        let mut initial = vec![0.0; spec.num_params()];
        initial[0] = mean;
        for (i, slot) in initial[1..].iter_mut().enumerate() {
            *slot = 0.1 / (i + 1) as f64;
        }

        // Coefficients bounded for stationarity/invertibility; intercept free.
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(n_coeffs));

        let outcome = minimize_simplex(
            |params| Self::css(work, &spec, &Coefficients::from_flat(params, &spec)),
            &initial,
            Some(&bounds),
            SimplexOptions {
                max_iter: 1000,
                tolerance: 1e-8,
                ..Default::default()
            },
        );

        if !outcome.value.is_finite() {
            return Err(AnalysisError::ModelFit(format!(
                "objective is not finite for order ({},{},{})({},{},{})[{}]",
                spec.p,
                spec.d,
                spec.q,
                spec.seasonal.p,
                spec.seasonal.d,
                spec.seasonal.q,
                spec.seasonal.period,
            )));
        }
        if !outcome.converged {
            tracing::warn!(
                iterations = outcome.iterations,
                "SARIMA estimation stopped before reaching tolerance; using best parameters found"
            );
        }

        self.converged = outcome.converged;
        self.coefficients = Coefficients::from_flat(&outcome.point, &spec);
        Ok(())
    }

    fn compute_fitted(&mut self, work: &[f64]) {
        let n = work.len();
        let start = self.spec.max_lag();
        let period = self.spec.seasonal.period.max(1);

        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];
        for t in start..n {
            let pred = self
                .coefficients
                .predict_at(work, &residuals, t, period);
            fitted[t] = pred;
            residuals[t] = work[t] - pred;
        }

        let tail = &residuals[start..];
        if !tail.is_empty() {
            let variance = tail.iter().map(|r| r * r).sum::<f64>() / tail.len() as f64;
            self.residual_variance = Some(variance);

            let n_eff = tail.len() as f64;
            let k = self.spec.num_params() as f64;
            let ll = -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
            self.aic = Some(-2.0 * ll + 2.0 * k);
            self.bic = Some(-2.0 * ll + k * n_eff.ln());
        }

        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
    }
}

impl Default for Sarima {
    fn default() -> Self {
        Self::new(SarimaSpec::default())
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &MonthlySeries) -> Result<()> {
        let values = series.values();
        let spec = self.spec;
        let period = spec.seasonal.period.max(1);

        let consumed = spec.d + spec.seasonal.d * period;
        let min_len = consumed + spec.max_lag() + 2;
        if values.len() < min_len {
            return Err(AnalysisError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }

        let seasonal_diffed = seasonal_difference(values, spec.seasonal.d, period);
        let work = difference(&seasonal_diffed, spec.d);

        self.estimate(&work)?;
        self.compute_fitted(&work);

        self.history = Some(values.to_vec());
        self.seasonal_diffed = Some(seasonal_diffed);
        self.work = Some(work);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let history = self.history.as_ref().ok_or(AnalysisError::FitRequired)?;
        let seasonal_diffed = self
            .seasonal_diffed
            .as_ref()
            .ok_or(AnalysisError::FitRequired)?;
        let work = self.work.as_ref().ok_or(AnalysisError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(AnalysisError::FitRequired)?;

        if horizon == 0 {
            return Ok(vec![]);
        }

        let period = self.spec.seasonal.period.max(1);

        // Recurse forward on the differenced scale; future shocks are zero.
        let mut extended = work.clone();
        let mut extended_residuals = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let pred = self
                .coefficients
                .predict_at(&extended, &extended_residuals, t, period);
            extended.push(pred);
            extended_residuals.push(0.0);
        }
        let forecast_diffed = extended[work.len()..].to_vec();

        // Integrate back: regular differencing first, then seasonal.
        let regular = integrate(&forecast_diffed, seasonal_diffed, self.spec.d);
        let predictions =
            seasonal_integrate(&regular, history, self.spec.seasonal.d, period);

        Ok(predictions)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(values: Vec<f64>) -> MonthlySeries {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        MonthlySeries::from_start(start, values).unwrap()
    }

    /// Trend plus a strong period-12 seasonal shape.
    fn seasonal_values(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                200.0
                    + 1.5 * i as f64
                    + 25.0 * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin()
            })
            .collect()
    }

    #[test]
    fn default_spec_matches_the_form_defaults() {
        let spec = SarimaSpec::default();
        assert_eq!((spec.p, spec.d, spec.q), (2, 0, 0));
        assert_eq!(
            (spec.seasonal.p, spec.seasonal.d, spec.seasonal.q, spec.seasonal.period),
            (0, 1, 1, 12)
        );
        assert_eq!(spec.num_params(), 4);
        assert_eq!(spec.max_lag(), 12);
    }

    #[test]
    fn fit_and_predict_with_default_order() {
        let series = make_series(seasonal_values(48));
        let mut model = Sarima::default();
        model.fit(&series).unwrap();

        assert!(model.is_fitted());
        assert_eq!(model.ar_coefficients().len(), 2);
        assert_eq!(model.seasonal_ma_coefficients().len(), 1);

        let predictions = model.predict(12).unwrap();
        assert_eq!(predictions.len(), 12);
        for value in &predictions {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn seasonal_differencing_carries_the_pattern_forward() {
        // Exact period-12 pattern plus linear trend: SARIMA(0,1,0)(0,1,0)[12]
        // reproduces it exactly without any estimated coefficients.
        let series = make_series(seasonal_values(48));
        let spec = SarimaSpec::new(0, 1, 0, SeasonalSpec::new(0, 1, 0, 12));
        let mut model = Sarima::new(spec);
        model.fit(&series).unwrap();

        let predictions = model.predict(6).unwrap();
        let expected = seasonal_values(54)[48..].to_vec();
        for (got, want) in predictions.iter().zip(expected.iter()) {
            // Intercept absorbs the tiny CSS mean of an exact pattern.
            assert!((got - want).abs() < 1.0, "got {got}, want {want}");
        }
    }

    #[test]
    fn ar1_coefficient_is_recovered_roughly() {
        // AR(1) with phi = 0.7 around a fixed level.
        let mut values = vec![50.0];
        for i in 1..120 {
            let shock = ((i * 37) % 17) as f64 / 17.0 - 0.5;
            values.push(50.0 + 0.7 * (values[i - 1] - 50.0) + shock);
        }
        let series = make_series(values);

        let spec = SarimaSpec::new(1, 0, 0, SeasonalSpec::new(0, 0, 0, 1));
        let mut model = Sarima::new(spec);
        model.fit(&series).unwrap();

        assert!(
            model.ar_coefficients()[0] > 0.3,
            "phi = {}",
            model.ar_coefficients()[0]
        );
    }

    #[test]
    fn intercept_only_model_forecasts_the_mean() {
        let values = vec![10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 12.0, 13.0];
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let series = make_series(values);

        let spec = SarimaSpec::new(0, 0, 0, SeasonalSpec::new(0, 0, 0, 1));
        let mut model = Sarima::new(spec);
        model.fit(&series).unwrap();
        assert!(model.converged());

        let predictions = model.predict(3).unwrap();
        for value in &predictions {
            assert!((value - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn insufficient_data_is_reported_with_the_requirement() {
        let series = make_series(vec![1.0, 2.0, 3.0]);
        let mut model = Sarima::default();
        // Needs d + D*s + max_lag + 2 = 0 + 12 + 12 + 2 = 26 points.
        match model.fit(&series) {
            Err(AnalysisError::InsufficientData { needed, got }) => {
                assert_eq!(needed, 26);
                assert_eq!(got, 3);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let model = Sarima::default();
        assert!(matches!(model.predict(5), Err(AnalysisError::FitRequired)));
    }

    #[test]
    fn zero_horizon_returns_no_predictions() {
        let series = make_series(seasonal_values(48));
        let mut model = Sarima::default();
        model.fit(&series).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn information_criteria_are_available_after_fit() {
        let series = make_series(seasonal_values(48));
        let mut model = Sarima::default();
        model.fit(&series).unwrap();
        assert!(model.aic().is_some());
        assert!(model.bic().is_some());
    }

    #[test]
    fn fitting_twice_is_deterministic() {
        let series = make_series(seasonal_values(60));
        let mut first = Sarima::default();
        let mut second = Sarima::default();
        first.fit(&series).unwrap();
        second.fit(&series).unwrap();

        assert_eq!(first.predict(12).unwrap(), second.predict(12).unwrap());
    }
}

//! Per-run analysis configuration gathered from the parameter form.

use crate::error::{AnalysisError, Result};
use crate::models::sarima::{SarimaSpec, SeasonalSpec};
use chrono::NaiveDate;

/// Allowed range for the forecast horizon, in months.
pub const HORIZON_RANGE: (usize, usize) = (1, 48);
/// Allowed range for AR and MA orders (p, q, P, Q).
pub const AR_MA_RANGE: (usize, usize) = (0, 5);
/// Allowed range for differencing orders (d, D).
pub const DIFF_RANGE: (usize, usize) = (0, 2);
/// Allowed range for the seasonal period (s).
pub const PERIOD_RANGE: (usize, usize) = (1, 12);

/// Configuration for one modeling run.
///
/// Created fresh from the submitted form, validated, consumed, and
/// discarded; nothing is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// First month of the synthesized index.
    pub start: NaiveDate,
    /// Number of months to forecast.
    pub horizon: usize,
    /// Non-seasonal AR order (p).
    pub p: usize,
    /// Non-seasonal differencing order (d).
    pub d: usize,
    /// Non-seasonal MA order (q).
    pub q: usize,
    /// Seasonal AR order (P).
    pub seasonal_p: usize,
    /// Seasonal differencing order (D).
    pub seasonal_d: usize,
    /// Seasonal MA order (Q).
    pub seasonal_q: usize,
    /// Seasonal period (s).
    pub period: usize,
}

impl Default for AnalysisConfig {
    /// Form defaults: start 2000-01-01, horizon 12, order (2,0,0)(0,1,1)[12].
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            horizon: 12,
            p: 2,
            d: 0,
            q: 0,
            seasonal_p: 0,
            seasonal_d: 1,
            seasonal_q: 1,
            period: 12,
        }
    }
}

impl AnalysisConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_range("horizon", self.horizon, HORIZON_RANGE)?;
        check_range("p", self.p, AR_MA_RANGE)?;
        check_range("d", self.d, DIFF_RANGE)?;
        check_range("q", self.q, AR_MA_RANGE)?;
        check_range("P", self.seasonal_p, AR_MA_RANGE)?;
        check_range("D", self.seasonal_d, DIFF_RANGE)?;
        check_range("Q", self.seasonal_q, AR_MA_RANGE)?;
        check_range("s", self.period, PERIOD_RANGE)?;
        Ok(())
    }

    /// The SARIMA order this configuration describes.
    pub fn order(&self) -> SarimaSpec {
        SarimaSpec::new(
            self.p,
            self.d,
            self.q,
            SeasonalSpec::new(
                self.seasonal_p,
                self.seasonal_d,
                self.seasonal_q,
                self.period,
            ),
        )
    }
}

fn check_range(name: &str, value: usize, (min, max): (usize, usize)) -> Result<()> {
    if value < min || value > max {
        return Err(AnalysisError::InvalidParameter(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(cfg.horizon, 12);
        assert_eq!(
            (cfg.p, cfg.d, cfg.q),
            (2, 0, 0),
        );
        assert_eq!(
            (cfg.seasonal_p, cfg.seasonal_d, cfg.seasonal_q, cfg.period),
            (0, 1, 1, 12),
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn horizon_bounds_are_inclusive() {
        let mut cfg = AnalysisConfig::default();

        cfg.horizon = 1;
        assert!(cfg.validate().is_ok());
        cfg.horizon = 48;
        assert!(cfg.validate().is_ok());

        cfg.horizon = 0;
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
        cfg.horizon = 49;
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn order_bounds_are_enforced() {
        let mut cfg = AnalysisConfig::default();
        cfg.p = 6;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.d = 3;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.period = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.period = 13;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn order_builds_the_sarima_spec() {
        let cfg = AnalysisConfig::default();
        let spec = cfg.order();
        assert_eq!((spec.p, spec.d, spec.q), (2, 0, 0));
        assert_eq!(
            (
                spec.seasonal.p,
                spec.seasonal.d,
                spec.seasonal.q,
                spec.seasonal.period
            ),
            (0, 1, 1, 12)
        );
    }
}

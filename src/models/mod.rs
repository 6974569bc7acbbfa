//! Forecasting models.

mod traits;

pub mod sarima;

pub use traits::Forecaster;

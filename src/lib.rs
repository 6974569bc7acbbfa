//! # previsao
//!
//! Seasonal decomposition and SARIMA forecasting for monthly time series,
//! served as a single-page web application. Upload a headerless one-column
//! CSV, pick the model orders, and get back the decomposition plot, the
//! forecast plot and table, and the forecast as a downloadable CSV.

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod decompose;
pub mod error;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod utils;
pub mod web;

pub use error::{AnalysisError, Result};

pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::core::{ForecastTable, MonthlySeries};
    pub use crate::decompose::{seasonal_decompose, Decomposition};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::models::Forecaster;
    pub use crate::pipeline::{run_analysis, AnalysisReport};
}

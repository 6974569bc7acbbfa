//! SARIMA (Seasonal Autoregressive Integrated Moving Average) model.
//!
//! Non-seasonal order (p, d, q) and seasonal order (P, D, Q)\[s\], estimated
//! by conditional sum of squares on the differenced series.

mod diff;
mod model;

pub use diff::{difference, integrate, seasonal_difference, seasonal_integrate};
pub use model::{Sarima, SarimaSpec, SeasonalSpec};

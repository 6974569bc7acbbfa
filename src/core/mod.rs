//! Core data structures for the analysis pipeline.

mod forecast;
mod series;

pub use forecast::ForecastTable;
pub use series::{month_end_after, MonthlySeries};

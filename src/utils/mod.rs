//! Numerical utilities.

pub mod optimization;

pub use optimization::{minimize_simplex, SimplexOptions, SimplexOutcome};

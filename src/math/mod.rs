//! Mathematical utilities: least squares and correlation.

pub mod ols;

pub use ols::*;

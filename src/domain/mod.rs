//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the loaded input rows (`SalesRecord`, `Dataset`)
//! - the generic group-by/reduce primitive (`GroupedAggregate`)
//! - analysis outputs (`ForecastResult`, `RevenueTotals`, etc.)

pub mod group;
pub mod types;

pub use group::*;
pub use types::*;

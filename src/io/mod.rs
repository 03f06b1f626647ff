//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - sales-allocation CSV export (`export`)
//! - batch JSON report read/write (`report`)

pub mod export;
pub mod ingest;
pub mod report;

pub use export::*;
pub use ingest::*;
pub use report::*;

//! `rx-sales` library crate.
//!
//! The binary (`rxs`) is a thin wrapper around this library so that:
//!
//! - core analytics are testable without spawning processes
//! - modules are reusable (e.g., future web dashboard, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod compete;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod metrics;
pub mod report;

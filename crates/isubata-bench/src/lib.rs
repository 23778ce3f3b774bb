//! Repeatedly runs the external benchmark binary and aggregates the
//! `score` it reports.

pub mod report;
pub mod runner;
pub mod stats;

pub use report::Report;
pub use runner::BenchCommand;
pub use stats::Summary;

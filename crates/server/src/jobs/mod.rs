//! # Batch Jobs
//!
//! One-shot jobs invoked from the CLI; an external scheduler owns the
//! cadence.

pub mod open_points;

pub use open_points::{run_open_points_job, OpenPointsSummary};

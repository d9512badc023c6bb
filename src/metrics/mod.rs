//! Approach Metrics Schema
//!
//! Pose-error statistics for one SLAM approach, computed elsewhere and read
//! back here for plotting.
//!
//! ## Schema Overview
//!
//! ```text
//! ApproachMetrics (1) ──── SequenceMetrics (1)
//!        │                    ├── all translation deviations [m]
//!        │                    ├── all rotation deviations [rad]
//!        │                    └── AteResults (sequence RMSE)
//!        └──< TrajectoryMetrics (N)
//!                             └── AteResults (per-trajectory RMSE)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use waypoint_eval::metrics::{JsonMetricsReader, MetricsReader};
//!
//! let metrics = JsonMetricsReader.read(Path::new("obvi_slam_metrics.json"))?;
//! println!(
//!     "{} trajectories, sequence RMSE {} m",
//!     metrics.trajectory_metrics().len(),
//!     metrics.sequence_metrics().ate_results().rmse_transl_err()
//! );
//! # Ok::<(), waypoint_eval::Error>(())
//! ```

mod approach_metrics;
mod json_reader;

pub use approach_metrics::{AteResults, ApproachMetrics, SequenceMetrics, TrajectoryMetrics};
pub use json_reader::JsonMetricsReader;

use crate::Result;
use std::path::Path;

/// Source of parsed per-approach metrics.
///
/// The orchestrator only depends on this trait, so alternative metrics file
/// formats plug in without touching the plotting code.
pub trait MetricsReader {
    /// Read and parse the metrics file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    fn read(&self, path: &Path) -> Result<ApproachMetrics>;
}

impl<R: MetricsReader + ?Sized> MetricsReader for &R {
    fn read(&self, path: &Path) -> Result<ApproachMetrics> {
        (**self).read(path)
    }
}

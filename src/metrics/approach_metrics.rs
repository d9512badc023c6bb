//! Approach Metrics - parsed pose-error statistics for one approach

use serde::Deserialize;

use super::json_reader::{deserialize_sample, deserialize_samples};

/// Absolute trajectory error summary.
///
/// Translation RMSE is in meters, rotation RMSE in degrees. Either may be
/// infinite when the approach lost track.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct AteResults {
    #[serde(deserialize_with = "deserialize_sample")]
    rmse_transl_err: f64,
    #[serde(deserialize_with = "deserialize_sample")]
    rmse_rot_err: f64,
}

impl AteResults {
    /// Create a new ATE summary.
    #[must_use]
    pub const fn new(rmse_transl_err: f64, rmse_rot_err: f64) -> Self {
        Self {
            rmse_transl_err,
            rmse_rot_err,
        }
    }

    /// Translation RMSE (m).
    #[must_use]
    pub const fn rmse_transl_err(&self) -> f64 {
        self.rmse_transl_err
    }

    /// Rotation RMSE (deg).
    #[must_use]
    pub const fn rmse_rot_err(&self) -> f64 {
        self.rmse_rot_err
    }
}

/// Results over the full run of an approach (all trajectories together).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SequenceMetrics {
    #[serde(deserialize_with = "deserialize_samples")]
    all_translation_deviations: Vec<f64>,
    #[serde(deserialize_with = "deserialize_samples")]
    all_rotation_deviations: Vec<f64>,
    ate_results: AteResults,
}

impl SequenceMetrics {
    /// Create sequence-level metrics.
    ///
    /// # Arguments
    ///
    /// * `all_translation_deviations` - Per-frame waypoint position deviations (m)
    /// * `all_rotation_deviations` - Per-frame waypoint orientation deviations (rad)
    /// * `ate_results` - RMSE over the whole sequence
    #[must_use]
    pub fn new(
        all_translation_deviations: Vec<f64>,
        all_rotation_deviations: Vec<f64>,
        ate_results: AteResults,
    ) -> Self {
        Self {
            all_translation_deviations,
            all_rotation_deviations,
            ate_results,
        }
    }

    /// Waypoint position deviations (m).
    #[must_use]
    pub fn all_translation_deviations(&self) -> &[f64] {
        &self.all_translation_deviations
    }

    /// Waypoint orientation deviations (rad).
    #[must_use]
    pub fn all_rotation_deviations(&self) -> &[f64] {
        &self.all_rotation_deviations
    }

    /// Sequence-level RMSE.
    #[must_use]
    pub const fn ate_results(&self) -> AteResults {
        self.ate_results
    }
}

/// Results for a single trajectory (bagfile) of the sequence.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct TrajectoryMetrics {
    ate_results: AteResults,
}

impl TrajectoryMetrics {
    /// Create per-trajectory metrics.
    #[must_use]
    pub const fn new(ate_results: AteResults) -> Self {
        Self { ate_results }
    }

    /// Trajectory RMSE.
    #[must_use]
    pub const fn ate_results(&self) -> AteResults {
        self.ate_results
    }
}

/// Everything the metrics file holds for one approach.
///
/// Produced once per approach per run and read-only afterwards.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApproachMetrics {
    sequence_metrics: SequenceMetrics,
    #[serde(rename = "indiv_trajectory_metrics", default)]
    trajectory_metrics: Vec<TrajectoryMetrics>,
}

impl ApproachMetrics {
    /// Create approach metrics from sequence and ordered per-trajectory results.
    #[must_use]
    pub fn new(
        sequence_metrics: SequenceMetrics,
        trajectory_metrics: Vec<TrajectoryMetrics>,
    ) -> Self {
        Self {
            sequence_metrics,
            trajectory_metrics,
        }
    }

    /// Full-run results.
    #[must_use]
    pub const fn sequence_metrics(&self) -> &SequenceMetrics {
        &self.sequence_metrics
    }

    /// Per-trajectory results in trajectory order.
    #[must_use]
    pub fn trajectory_metrics(&self) -> &[TrajectoryMetrics] {
        &self.trajectory_metrics
    }

    /// Translation RMSE of every trajectory, in trajectory order (m).
    #[must_use]
    pub fn trajectory_transl_rmses(&self) -> Vec<f64> {
        self.trajectory_metrics
            .iter()
            .map(|t| t.ate_results().rmse_transl_err())
            .collect()
    }

    /// Rotation RMSE of every trajectory, in trajectory order (deg).
    #[must_use]
    pub fn trajectory_rot_rmses(&self) -> Vec<f64> {
        self.trajectory_metrics
            .iter()
            .map(|t| t.ate_results().rmse_rot_err())
            .collect()
    }
}

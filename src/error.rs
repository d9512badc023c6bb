//! Error types for waypoint-eval
//!
//! Every failure names the input that caused it, so an analyst can fix the
//! offending file and re-run.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// waypoint-eval error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV table could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Metrics file could not be opened or parsed
    #[error("Metrics file {path}: {reason}")]
    MetricsFile {
        /// Offending metrics file
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Approach registry has no rows
    #[error("Approach registry {0} is empty; the first row names the primary approach")]
    EmptyRegistry(String),

    /// A table row does not have the expected shape
    #[error("{file}:{line}: {reason}")]
    MalformedRow {
        /// Offending table file
        file: String,
        /// 1-based line number
        line: u64,
        /// What went wrong
        reason: String,
    },

    /// A sample series has nothing left to bin once infinities are removed
    #[error("No finite samples to bin (every value was infinite or the series was empty)")]
    NoFiniteSamples,

    /// Approach name outside the closed style registry
    #[error("Unknown approach '{0}': expected one of ObVi-SLAM, ORB-SLAM3, OA-SLAM, Pseudo-Groundtruth")]
    UnknownApproach(String),

    /// Axis break interval is empty, reversed, or overlaps another one
    #[error("Invalid axis interval [{low}, {high}]: {reason}")]
    InvalidInterval {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
        /// What went wrong
        reason: String,
    },

    /// Invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Plotting backend failure
    #[error("Render error: {0}")]
    Render(String),

    /// Interactive viewer failure
    #[error("Viewer error: {0}")]
    Viewer(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}

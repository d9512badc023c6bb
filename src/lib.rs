//! # waypoint-eval: SLAM waypoint-consistency and ATE report charts
//!
//! Compares localization/SLAM approaches against a designated primary
//! approach. Pose errors are computed elsewhere; this crate reads the
//! per-approach metrics files and draws:
//!
//! - CDFs of waypoint position and orientation deviations
//! - Broken-axis scatter charts of per-trajectory ATE RMSE
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use waypoint_eval::report::{run_report, ReportConfig};
//!
//! run_report(
//!     Path::new("approaches.csv"),
//!     Some(Path::new("save_paths.csv")),
//!     ReportConfig::default(),
//! )?;
//! # Ok::<(), waypoint_eval::Error>(())
//! ```
//!
//! Building a CDF directly:
//!
//! ```rust
//! use waypoint_eval::cdf::EmpiricalCdf;
//!
//! let cdf = EmpiricalCdf::from_samples(&[0.2, 0.4, 0.4, f64::INFINITY], 4)?;
//! assert_eq!(cdf.proportions().len(), 5);
//! assert_eq!(cdf.dropped_infinite(), 1);
//! # Ok::<(), waypoint_eval::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cdf;
pub mod chart;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod report;
pub mod save_paths;
pub mod style;

pub use error::{Error, Result};

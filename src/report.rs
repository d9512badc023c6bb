//! Report orchestration
//!
//! Reads every approach's metrics in registry order, then renders the four
//! report charts in a fixed sequence: translation CDF, orientation CDF,
//! translation RMSE, rotation RMSE. Only the CDF charts honour save paths;
//! the RMSE charts always go to display.

use std::path::Path;

use tracing::info;

use crate::cdf::DEFAULT_BINS;
use crate::chart::{
    AxisInterval, CdfChart, CdfKind, ChartOutput, ChartSink, LegendLocation, RmseChart,
    DEFAULT_CHART_SIZE,
};
use crate::metrics::{AteResults, JsonMetricsReader, MetricsReader};
use crate::registry::ApproachRegistry;
use crate::save_paths::{ErrorType, SavePaths};
use crate::style::marker_for;
use crate::Result;

/// Report tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Histogram bin count for both CDFs
    pub bins: usize,
    /// Y-axis breaks for the translation RMSE chart (m)
    pub transl_rmse_breaks: Vec<AxisInterval>,
    /// Y-axis breaks for the rotation RMSE chart (deg)
    pub rot_rmse_breaks: Vec<AxisInterval>,
    /// Legend placement on every chart
    pub legend: LegendLocation,
    /// Chart size in pixels
    pub chart_size: (u32, u32),
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            transl_rmse_breaks: vec![
                AxisInterval::fixed(0.0, 6.0),
                AxisInterval::fixed(19.5, 22.0),
            ],
            rot_rmse_breaks: vec![
                AxisInterval::fixed(0.0, 0.6),
                AxisInterval::fixed(1.0, 1.4),
            ],
            legend: LegendLocation::UpperLeft,
            chart_size: DEFAULT_CHART_SIZE,
        }
    }
}

/// What the report needs from one approach's metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachResults {
    name: String,
    translation_deviations: Vec<f64>,
    orientation_deviations_deg: Vec<f64>,
    sequence_ate: AteResults,
    transl_rmses: Vec<f64>,
    rot_rmses: Vec<f64>,
}

impl ApproachResults {
    /// Approach name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waypoint position deviations (m).
    #[must_use]
    pub fn translation_deviations(&self) -> &[f64] {
        &self.translation_deviations
    }

    /// Waypoint orientation deviations, converted to degrees.
    #[must_use]
    pub fn orientation_deviations_deg(&self) -> &[f64] {
        &self.orientation_deviations_deg
    }

    /// Sequence-level RMSE.
    #[must_use]
    pub const fn sequence_ate(&self) -> AteResults {
        self.sequence_ate
    }

    /// Per-trajectory translation RMSE (m).
    #[must_use]
    pub fn transl_rmses(&self) -> &[f64] {
        &self.transl_rmses
    }

    /// Per-trajectory rotation RMSE (deg).
    #[must_use]
    pub fn rot_rmses(&self) -> &[f64] {
        &self.rot_rmses
    }
}

/// Collected results for every approach, ready to chart.
#[derive(Debug, Clone)]
pub struct Report {
    primary: String,
    approaches: Vec<ApproachResults>,
    config: ReportConfig,
}

impl Report {
    /// Read every approach's metrics through `reader`, in registry order.
    ///
    /// Markers are resolved for every approach before any metrics file is
    /// opened, so a name without a marker fails before any I/O.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::UnknownApproach`] for a name outside the style registry
    /// - Any error from `reader`; one bad metrics file aborts the whole run
    pub fn collect<R: MetricsReader>(
        registry: &ApproachRegistry,
        reader: R,
        config: ReportConfig,
    ) -> Result<Self> {
        for name in registry.names() {
            marker_for(name)?;
        }

        let mut approaches = Vec::with_capacity(registry.len());
        for (name, metrics_file) in registry.iter() {
            info!(approach = name, file = %metrics_file.display(), "Reading results for approach");
            let metrics = reader.read(metrics_file)?;
            let sequence = metrics.sequence_metrics();
            let sequence_ate = sequence.ate_results();
            info!(
                approach = name,
                rmse_transl_m = sequence_ate.rmse_transl_err(),
                rmse_rot_deg = sequence_ate.rmse_rot_err(),
                "Sequence RMSE"
            );

            approaches.push(ApproachResults {
                name: name.to_string(),
                translation_deviations: sequence.all_translation_deviations().to_vec(),
                orientation_deviations_deg: sequence
                    .all_rotation_deviations()
                    .iter()
                    .map(|rad| rad.to_degrees())
                    .collect(),
                sequence_ate,
                transl_rmses: metrics.trajectory_transl_rmses(),
                rot_rmses: metrics.trajectory_rot_rmses(),
            });
        }

        Ok(Self {
            primary: registry.primary().to_string(),
            approaches,
            config,
        })
    }

    /// Primary approach name.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Per-approach results in registry order.
    #[must_use]
    pub fn approaches(&self) -> &[ApproachResults] {
        &self.approaches
    }

    /// Translation deviation CDF chart.
    ///
    /// # Errors
    ///
    /// Fails if any approach has no finite translation deviation.
    pub fn translation_cdf_chart(&self) -> Result<CdfChart> {
        let samples: Vec<(&str, &[f64])> = self
            .approaches
            .iter()
            .map(|a| (a.name(), a.translation_deviations()))
            .collect();
        let chart = CdfChart::build(
            CdfKind::Translation,
            &self.primary,
            &samples,
            self.config.bins,
        )?;
        Ok(chart.with_legend(self.config.legend))
    }

    /// Orientation deviation CDF chart (degrees).
    ///
    /// # Errors
    ///
    /// Fails if any approach has no finite orientation deviation.
    pub fn orientation_cdf_chart(&self) -> Result<CdfChart> {
        let samples: Vec<(&str, &[f64])> = self
            .approaches
            .iter()
            .map(|a| (a.name(), a.orientation_deviations_deg()))
            .collect();
        let chart = CdfChart::build(
            CdfKind::Orientation,
            &self.primary,
            &samples,
            self.config.bins,
        )?;
        Ok(chart.with_legend(self.config.legend))
    }

    /// Per-trajectory translation RMSE chart.
    ///
    /// # Errors
    ///
    /// Fails if the configured breaks are invalid.
    pub fn translation_rmse_chart(&self) -> Result<RmseChart> {
        let rmses: Vec<(&str, &[f64])> = self
            .approaches
            .iter()
            .map(|a| (a.name(), a.transl_rmses()))
            .collect();
        RmseChart::build(
            ErrorType::TranslAte,
            &rmses,
            &self.config.transl_rmse_breaks,
            self.config.legend,
        )
    }

    /// Per-trajectory rotation RMSE chart.
    ///
    /// # Errors
    ///
    /// Fails if the configured breaks are invalid.
    pub fn rotation_rmse_chart(&self) -> Result<RmseChart> {
        let rmses: Vec<(&str, &[f64])> = self
            .approaches
            .iter()
            .map(|a| (a.name(), a.rot_rmses()))
            .collect();
        RmseChart::build(
            ErrorType::OrientAte,
            &rmses,
            &self.config.rot_rmse_breaks,
            self.config.legend,
        )
    }

    /// Render all four charts through `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first chart layout or rendering failure.
    pub fn render(&self, save_paths: &SavePaths, sink: &mut ChartSink) -> Result<()> {
        sink.emit(
            &self.translation_cdf_chart()?,
            &ChartOutput::from_save_path(save_paths.get(ErrorType::TranslCdf)),
        )?;
        sink.emit(
            &self.orientation_cdf_chart()?,
            &ChartOutput::from_save_path(save_paths.get(ErrorType::OrientCdf)),
        )?;
        sink.emit(&self.translation_rmse_chart()?, &ChartOutput::Display)?;
        sink.emit(&self.rotation_rmse_chart()?, &ChartOutput::Display)?;
        Ok(())
    }
}

/// Run the full report: load the registry, resolve save paths, read metrics
/// as JSON and render every chart.
///
/// # Errors
///
/// Fails on a missing or malformed registry, any unreadable metrics file, or
/// a rendering failure. Save-path problems only warn.
pub fn run_report(
    registry_path: &Path,
    save_paths_path: Option<&Path>,
    config: ReportConfig,
) -> Result<()> {
    let registry = ApproachRegistry::load(registry_path)?;
    let save_paths = SavePaths::resolve(save_paths_path);
    let mut sink = ChartSink::new(config.chart_size);

    let report = Report::collect(&registry, JsonMetricsReader, config)?;
    report.render(&save_paths, &mut sink)?;

    info!(approaches = report.approaches().len(), "Report complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::metrics::{ApproachMetrics, SequenceMetrics, TrajectoryMetrics};
    use crate::Error;

    struct FixedReader(HashMap<PathBuf, ApproachMetrics>);

    impl MetricsReader for FixedReader {
        fn read(&self, path: &Path) -> Result<ApproachMetrics> {
            self.0.get(path).cloned().ok_or_else(|| Error::MetricsFile {
                path: path.display().to_string(),
                reason: "missing".to_string(),
            })
        }
    }

    fn metrics(transl: Vec<f64>, rot: Vec<f64>, rmses: &[(f64, f64)]) -> ApproachMetrics {
        ApproachMetrics::new(
            SequenceMetrics::new(transl, rot, AteResults::new(1.0, 0.1)),
            rmses
                .iter()
                .map(|(t, r)| TrajectoryMetrics::new(AteResults::new(*t, *r)))
                .collect(),
        )
    }

    fn fixture() -> (ApproachRegistry, FixedReader) {
        let registry = ApproachRegistry::from_reader(
            "ObVi-SLAM,obvi.json\nORB-SLAM3,orb.json\n".as_bytes(),
            "t.csv",
        )
        .unwrap();
        let mut files = HashMap::new();
        files.insert(
            PathBuf::from("obvi.json"),
            metrics(vec![0.1, 0.2, 0.4], vec![std::f64::consts::PI], &[(1.0, 0.2), (2.0, 0.3)]),
        );
        files.insert(
            PathBuf::from("orb.json"),
            metrics(vec![0.5, f64::INFINITY], vec![0.01], &[(20.0, f64::INFINITY)]),
        );
        (registry, FixedReader(files))
    }

    #[test]
    fn test_collect_in_registry_order() {
        let (registry, reader) = fixture();
        let report =
            Report::collect(&registry, &reader, ReportConfig::default()).unwrap();

        assert_eq!(report.primary(), "ObVi-SLAM");
        let names: Vec<&str> = report
            .approaches()
            .iter()
            .map(ApproachResults::name)
            .collect();
        assert_eq!(names, vec!["ObVi-SLAM", "ORB-SLAM3"]);
        assert_eq!(report.approaches()[0].transl_rmses(), &[1.0, 2.0]);
        assert_eq!(report.approaches()[1].translation_deviations().len(), 2);
    }

    #[test]
    fn test_orientation_converted_to_degrees() {
        let (registry, reader) = fixture();
        let report =
            Report::collect(&registry, &reader, ReportConfig::default()).unwrap();
        let deg = report.approaches()[0].orientation_deviations_deg()[0];
        assert!((deg - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_approach_fails_before_reading() {
        let registry = ApproachRegistry::from_reader(
            "ObVi-SLAM,a.json\nVINS,b.json\n".as_bytes(),
            "t.csv",
        )
        .unwrap();
        // empty reader: any read would fail with MetricsFile instead
        let reader = FixedReader(HashMap::new());
        let err =
            Report::collect(&registry, &reader, ReportConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownApproach(ref n) if n == "VINS"));
    }

    #[test]
    fn test_missing_metrics_aborts() {
        let (registry, mut reader) = fixture();
        reader.0.remove(Path::new("orb.json"));
        let err =
            Report::collect(&registry, &reader, ReportConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MetricsFile { .. }));
    }

    #[test]
    fn test_chart_layouts() {
        let (registry, reader) = fixture();
        let report =
            Report::collect(&registry, &reader, ReportConfig::default()).unwrap();

        let transl = report.translation_cdf_chart().unwrap();
        assert_eq!(transl.series().len(), 2);
        assert!(transl.shows_legend());

        let rmse = report.translation_rmse_chart().unwrap();
        assert_eq!(rmse.breaks().len(), 2);
        assert_eq!(rmse.trajectory_count(), 2);

        let rot = report.rotation_rmse_chart().unwrap();
        assert_eq!(rot.y_label(), "RMSE (deg)");
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.bins, 1000);
        assert!((config.transl_rmse_breaks[1].low() - 19.5).abs() < f64::EPSILON);
        assert!((config.rot_rmse_breaks[0].high() - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.chart_size, (1024, 768));
    }
}

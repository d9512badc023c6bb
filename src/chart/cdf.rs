//! Waypoint-consistency CDF chart
//!
//! One line per approach. The x limit is chosen so that a single approach
//! with a long tail does not squash everybody else: with two or more
//! approaches it is the larger of the primary approach's maximum and the
//! smallest maximum among the other approaches.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, error};

use super::{
    dash_polyline, Chart, LegendLocation, AXIS_FONT_SIZE, FONT, GRID_ALPHA, TITLE_FONT_SIZE,
};
use crate::cdf::EmpiricalCdf;
use crate::save_paths::ErrorType;
use crate::style::{assign_line_styles, series_color, LineStyle};
use crate::Result;

const LINE_WIDTH: u32 = 2;

/// Which deviation a CDF chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdfKind {
    /// Position deviation from the waypoint estimate centroid (m)
    Translation,
    /// Orientation deviation from the mean waypoint orientation (deg)
    Orientation,
}

impl CdfKind {
    /// Chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Translation => "CDF of Position Deviation from Waypoint Estimate Centroid",
            Self::Orientation => "CDF of Orientation Estimate Deviation from Mean Waypoint Orientation",
        }
    }

    /// X-axis label.
    #[must_use]
    pub const fn x_label(self) -> &'static str {
        match self {
            Self::Translation => "Meters from Respective Centroid",
            Self::Orientation => "Degrees from Mean Waypoint Orientation",
        }
    }

    /// Error-type tag this chart is saved under.
    #[must_use]
    pub const fn error_type(self) -> ErrorType {
        match self {
            Self::Translation => ErrorType::TranslCdf,
            Self::Orientation => ErrorType::OrientCdf,
        }
    }
}

/// One approach's CDF line, already clipped to the chart's x range.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfSeries {
    name: String,
    points: Vec<(f64, f64)>,
    max_value: f64,
    line_style: LineStyle,
    color: RGBColor,
}

impl CdfSeries {
    /// Approach name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(deviation, proportion)` points inside the chart's x range.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Largest finite deviation of the approach.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Line style.
    #[must_use]
    pub const fn line_style(&self) -> LineStyle {
        self.line_style
    }
}

/// Layout of a CDF chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfChart {
    kind: CdfKind,
    x_range: Range<f64>,
    series: Vec<CdfSeries>,
    legend: LegendLocation,
}

impl CdfChart {
    /// Lay out a CDF chart.
    ///
    /// # Arguments
    ///
    /// * `kind` - Translation or orientation (title, labels)
    /// * `primary` - Primary approach name
    /// * `samples` - `(approach, deviations)` in registry order
    /// * `bins` - Histogram bin count
    ///
    /// # Errors
    ///
    /// Propagates [`EmpiricalCdf::from_samples`] errors for any approach.
    pub fn build(
        kind: CdfKind,
        primary: &str,
        samples: &[(&str, &[f64])],
        bins: usize,
    ) -> Result<Self> {
        let names: Vec<&str> = samples.iter().map(|(name, _)| *name).collect();
        let styles = assign_line_styles(&names, primary);

        let mut cdfs = Vec::with_capacity(samples.len());
        for (name, values) in samples {
            debug!(chart = %kind.error_type(), approach = name, "Building CDF");
            let cdf = EmpiricalCdf::from_samples(values, bins).map_err(|e| {
                error!(approach = name, error = %e, "Cannot build CDF");
                e
            })?;
            debug!(
                approach = name,
                max = cdf.max_value(),
                dropped_infinite = cdf.dropped_infinite(),
                "CDF built"
            );
            cdfs.push(cdf);
        }

        let primary_max = names
            .iter()
            .zip(&cdfs)
            .find(|(name, _)| **name == primary)
            .map(|(_, cdf)| cdf.max_value());
        let other_maxes: Vec<f64> = names
            .iter()
            .zip(&cdfs)
            .filter(|(name, _)| **name != primary)
            .map(|(_, cdf)| cdf.max_value())
            .collect();

        let x_range = match x_limit(samples.len(), primary_max, &other_maxes) {
            Some(limit) if limit > 0.0 => 0.0..limit,
            _ => data_range(&cdfs),
        };

        let series = names
            .iter()
            .zip(cdfs)
            .zip(styles)
            .enumerate()
            .map(|(index, ((name, cdf), line_style))| CdfSeries {
                name: (*name).to_string(),
                points: clip_to_x_range(&cdf.points().collect::<Vec<_>>(), &x_range),
                max_value: cdf.max_value(),
                line_style,
                color: series_color(index),
            })
            .collect();

        Ok(Self {
            kind,
            x_range,
            series,
            legend: LegendLocation::default(),
        })
    }

    /// Place the legend somewhere other than the upper left.
    #[must_use]
    pub const fn with_legend(mut self, legend: LegendLocation) -> Self {
        self.legend = legend;
        self
    }

    /// Translation or orientation.
    #[must_use]
    pub const fn kind(&self) -> CdfKind {
        self.kind
    }

    /// Visible x range.
    #[must_use]
    pub fn x_range(&self) -> Range<f64> {
        self.x_range.clone()
    }

    /// Series in registry order.
    #[must_use]
    pub fn series(&self) -> &[CdfSeries] {
        &self.series
    }

    /// Whether a legend is drawn (two or more approaches).
    #[must_use]
    pub fn shows_legend(&self) -> bool {
        self.series.len() >= 2
    }
}

/// X-axis upper limit for a CDF chart with `count` approaches.
///
/// `None` when fewer than two approaches are plotted, in which case the data
/// range is used.
#[must_use]
pub fn x_limit(count: usize, primary_max: Option<f64>, other_maxes: &[f64]) -> Option<f64> {
    if count < 2 {
        return None;
    }
    let smallest_other = other_maxes.iter().copied().reduce(f64::min);
    match (primary_max, smallest_other) {
        (Some(p), Some(o)) => Some(p.max(o)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

fn data_range(cdfs: &[EmpiricalCdf]) -> Range<f64> {
    let lo = cdfs
        .iter()
        .filter_map(|c| c.edges().first().copied())
        .fold(f64::INFINITY, f64::min);
    let hi = cdfs
        .iter()
        .filter_map(|c| c.edges().last().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    if lo < hi {
        lo..hi
    } else {
        0.0..1.0
    }
}

/// Keep the part of an x-ascending polyline inside `range`, interpolating
/// the points where it crosses the bounds.
fn clip_to_x_range(points: &[(f64, f64)], range: &Range<f64>) -> Vec<(f64, f64)> {
    let (lo, hi) = (range.start, range.end);
    let lerp = |(x0, y0): (f64, f64), (x1, y1): (f64, f64), x: f64| {
        (x, (y1 - y0).mul_add((x - x0) / (x1 - x0), y0))
    };

    let mut clipped = Vec::with_capacity(points.len());
    for (i, &point) in points.iter().enumerate() {
        if i > 0 {
            let prev = points[i - 1];
            if prev.0 < lo && point.0 > lo {
                clipped.push(lerp(prev, point, lo));
            }
            if prev.0 < hi && point.0 > hi {
                clipped.push(lerp(prev, point, hi));
            }
        }
        if point.0 >= lo && point.0 <= hi {
            clipped.push(point);
        }
    }
    clipped
}

impl Chart for CdfChart {
    fn name(&self) -> &str {
        self.kind.error_type().tag()
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(self.kind.title(), (FONT, TITLE_FONT_SIZE))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(self.x_range.clone(), 0.0..1.0)?;

        chart
            .configure_mesh()
            .x_desc(self.kind.x_label())
            .y_desc("Proportion of data")
            .axis_desc_style((FONT, AXIS_FONT_SIZE))
            .bold_line_style(BLACK.mix(GRID_ALPHA))
            .light_line_style(BLACK.mix(0.0))
            .draw()?;

        let plot_area = chart.plotting_area().strip_coord_spec();
        let (base_x, base_y) = chart.plotting_area().get_base_pixel();

        for series in &self.series {
            let style = series.color.stroke_width(LINE_WIDTH);

            let anno = match series.line_style.dash_pattern(LINE_WIDTH) {
                None => chart.draw_series(LineSeries::new(series.points.iter().copied(), style))?,
                Some(pattern) => {
                    let pixels: Vec<(f64, f64)> = series
                        .points
                        .iter()
                        .map(|p| {
                            let (x, y) = chart.backend_coord(p);
                            (f64::from(x - base_x), f64::from(y - base_y))
                        })
                        .collect();
                    for dash in dash_polyline(&pixels, &pattern) {
                        plot_area.draw(&PathElement::new(to_pixels(&dash), style))?;
                    }
                    chart.draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                }
            };
            anno.label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        if self.shows_legend() {
            chart
                .configure_series_labels()
                .position(self.legend.into())
                .label_font((FONT, 16))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.3))
                .draw()?;
        }

        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_pixels(points: &[(f64, f64)]) -> Vec<(i32, i32)> {
    points
        .iter()
        .map(|(x, y)| (x.round() as i32, y.round() as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_limit_uses_smallest_other_max() {
        // primary max 2, others 5 and 3: limit is max(2, min(5, 3)) = 3
        assert_eq!(x_limit(3, Some(2.0), &[5.0, 3.0]), Some(3.0));
        // primary has the longest tail: limit is the primary's max
        assert_eq!(x_limit(2, Some(10.0), &[4.0]), Some(10.0));
    }

    #[test]
    fn test_x_limit_single_approach() {
        assert_eq!(x_limit(1, Some(2.0), &[]), None);
    }

    #[test]
    fn test_build_assigns_styles_and_limit() {
        let primary: Vec<f64> = vec![0.0, 1.0, 2.0];
        let long_tail: Vec<f64> = vec![0.0, 1.0, 50.0];
        let short: Vec<f64> = vec![0.0, 0.5, 4.0, f64::INFINITY];
        let chart = CdfChart::build(
            CdfKind::Translation,
            "ObVi-SLAM",
            &[
                ("ORB-SLAM3", long_tail.as_slice()),
                ("ObVi-SLAM", primary.as_slice()),
                ("OA-SLAM", short.as_slice()),
            ],
            10,
        )
        .unwrap();

        assert_eq!(chart.x_range(), 0.0..4.0);
        assert!(chart.shows_legend());
        let styles: Vec<LineStyle> = chart.series().iter().map(CdfSeries::line_style).collect();
        assert_eq!(
            styles,
            vec![LineStyle::Dotted, LineStyle::Solid, LineStyle::DashDot]
        );
        assert_eq!(chart.name(), "transl_cdf");
    }

    #[test]
    fn test_series_clipped_to_limit() {
        let a: Vec<f64> = (0..=10).map(f64::from).collect();
        let b: Vec<f64> = vec![0.0, 5.0];
        let chart = CdfChart::build(
            CdfKind::Orientation,
            "A",
            &[("A", a.as_slice()), ("B", b.as_slice())],
            10,
        )
        .unwrap();

        assert_eq!(chart.x_range(), 0.0..10.0);
        let b_points = chart.series()[1].points();
        assert!(b_points.iter().all(|(x, _)| *x <= 10.0));
        assert!((chart.series()[1].max_value() - 5.0).abs() < f64::EPSILON);

        let chart = CdfChart::build(
            CdfKind::Orientation,
            "B",
            &[("A", a.as_slice()), ("B", b.as_slice())],
            10,
        )
        .unwrap();
        assert_eq!(chart.x_range(), 0.0..10.0);
    }

    #[test]
    fn test_clip_interpolates_crossing() {
        let points = [(0.0, 0.0), (2.0, 0.5), (4.0, 1.0)];
        let clipped = clip_to_x_range(&points, &(0.0..3.0));
        assert_eq!(clipped.len(), 3);
        assert!((clipped[2].0 - 3.0).abs() < 1e-12);
        assert!((clipped[2].1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_single_approach_uses_data_range() {
        let a: Vec<f64> = vec![1.0, 3.0];
        let chart =
            CdfChart::build(CdfKind::Translation, "A", &[("A", a.as_slice())], 4).unwrap();
        assert_eq!(chart.x_range(), 1.0..3.0);
        assert!(!chart.shows_legend());
        assert_eq!(chart.series()[0].points().len(), 5);
    }

    #[test]
    fn test_all_infinite_series_fails_build() {
        let ok: Vec<f64> = vec![1.0];
        let lost: Vec<f64> = vec![f64::INFINITY, f64::INFINITY];
        let err = CdfChart::build(
            CdfKind::Translation,
            "A",
            &[("A", ok.as_slice()), ("B", lost.as_slice())],
            10,
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::NoFiniteSamples));
    }
}

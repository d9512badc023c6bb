//! Per-trajectory RMSE scatter on a broken y axis
//!
//! Each break interval gets its own stacked panel, highest interval on top,
//! with panel height proportional to the interval's span. Values that fall
//! between intervals are not drawn, which is the point: one approach's
//! outlier no longer compresses everybody else's resolution.

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use super::{
    sorted_breaks, AxisInterval, Chart, LegendLocation, AXIS_FONT_SIZE, FONT, GRID_ALPHA,
};
use crate::save_paths::ErrorType;
use crate::style::{marker_for, series_color, MarkerShape, MarkerStyle};
use crate::{Error, Result};

const Y_LABEL_STRIP: u32 = 40;
const X_LABEL_AREA: u32 = 50;
const PANEL_GAP: u32 = 12;
const TOP_MARGIN: u32 = 20;
const DEFAULT_HEADROOM: f64 = 1.05;

/// One approach's per-trajectory RMSE values.
#[derive(Debug, Clone, PartialEq)]
pub struct RmseSeries {
    name: String,
    values: Vec<f64>,
    marker: MarkerStyle,
    color: RGBColor,
}

impl RmseSeries {
    /// Approach name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// RMSE per trajectory, trajectory 1 first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Scatter marker.
    #[must_use]
    pub const fn marker(&self) -> MarkerStyle {
        self.marker
    }

    /// `(trajectory index, rmse)` points visible inside `interval`.
    ///
    /// Trajectory indices start at 1. Non-finite values are never visible.
    #[must_use]
    pub fn visible_points(&self, interval: &AxisInterval) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite() && interval.contains(**v))
            .map(|(i, v)| (index_coord(i + 1), *v))
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn index_coord(index: usize) -> f64 {
    index as f64
}

/// Layout of a broken-axis RMSE chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RmseChart {
    error_type: ErrorType,
    breaks: Vec<AxisInterval>,
    trajectory_count: usize,
    series: Vec<RmseSeries>,
    legend: LegendLocation,
}

impl RmseChart {
    /// Lay out an RMSE chart.
    ///
    /// # Arguments
    ///
    /// * `error_type` - Selects the y label (`RMSE (m)` or `RMSE (deg)`)
    /// * `rmses` - `(approach, per-trajectory RMSE)` in registry order
    /// * `breaks` - Y intervals to show; empty means one interval from 0 to
    ///   5% above the largest finite value
    /// * `legend` - Legend placement on the top panel
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownApproach`] if an approach has no marker
    /// - [`Error::InvalidInterval`] if break intervals overlap
    /// - [`Error::NoFiniteSamples`] if `breaks` is empty and no value is finite
    pub fn build(
        error_type: ErrorType,
        rmses: &[(&str, &[f64])],
        breaks: &[AxisInterval],
        legend: LegendLocation,
    ) -> Result<Self> {
        let breaks = if breaks.is_empty() {
            vec![default_interval(rmses)?]
        } else {
            sorted_breaks(breaks)?
        };
        debug!(chart = %error_type, ?breaks, "Laying out RMSE chart");

        let series = rmses
            .iter()
            .enumerate()
            .map(|(index, (name, values))| {
                Ok(RmseSeries {
                    name: (*name).to_string(),
                    values: values.to_vec(),
                    marker: marker_for(name)?,
                    color: series_color(index),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let trajectory_count = rmses.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        Ok(Self {
            error_type,
            breaks,
            trajectory_count,
            series,
            legend,
        })
    }

    /// Break intervals, ascending.
    #[must_use]
    pub fn breaks(&self) -> &[AxisInterval] {
        &self.breaks
    }

    /// Series in registry order.
    #[must_use]
    pub fn series(&self) -> &[RmseSeries] {
        &self.series
    }

    /// Longest per-trajectory list.
    #[must_use]
    pub const fn trajectory_count(&self) -> usize {
        self.trajectory_count
    }

    /// Y-axis label.
    #[must_use]
    pub const fn y_label(&self) -> &'static str {
        self.error_type.rmse_axis_label()
    }

    /// Pixel heights of the panels, top (highest interval) first, for a
    /// plot `height` pixels tall.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn panel_heights(&self, height: u32) -> Vec<u32> {
        let gaps = PANEL_GAP * (self.breaks.len() as u32).saturating_sub(1);
        let usable = height.saturating_sub(gaps + X_LABEL_AREA + TOP_MARGIN);
        let total_span: f64 = self.breaks.iter().map(AxisInterval::span).sum();

        let mut heights: Vec<u32> = self
            .breaks
            .iter()
            .rev()
            .map(|b| (f64::from(usable) * b.span() / total_span).round() as u32)
            .collect();

        // rounding leftovers go to the bottom panel, which also hosts the x labels
        let assigned: u32 = heights.iter().sum();
        if let Some(bottom) = heights.last_mut() {
            *bottom = (*bottom + usable).saturating_sub(assigned) + X_LABEL_AREA;
        }
        if let Some(top) = heights.first_mut() {
            *top += TOP_MARGIN;
        }
        heights
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        interval: &AxisInterval,
        top: bool,
        bottom: bool,
    ) -> Result<()> {
        let x_range = 0.5..(self.trajectory_count as f64 + 0.5);
        let mut chart = ChartBuilder::on(area)
            .margin_top(if top { TOP_MARGIN } else { 0 })
            .margin_right(20)
            .y_label_area_size(60)
            .x_label_area_size(if bottom { X_LABEL_AREA } else { 0 })
            .build_cartesian_2d(x_range, interval.low()..interval.high())?;

        let index_label = |x: &f64| format!("{x:.0}");
        let mut mesh = chart.configure_mesh();
        mesh.bold_line_style(BLACK.mix(GRID_ALPHA))
            .light_line_style(BLACK.mix(0.0))
            .x_labels(self.trajectory_count.clamp(1, 20))
            .y_labels(5)
            .x_label_formatter(&index_label);
        if bottom {
            mesh.x_desc("Bagfile Index")
                .axis_desc_style((FONT, AXIS_FONT_SIZE));
        }
        mesh.draw()?;

        for series in &self.series {
            let points = series.visible_points(interval);
            draw_markers(&mut chart, series, &points, top)?;
        }

        if top {
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

impl Chart for RmseChart {
    fn name(&self) -> &str {
        self.error_type.tag()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE)?;

        let (label_strip, plot_area) = root.split_horizontally(Y_LABEL_STRIP);
        let (_, height) = label_strip.dim_in_pixel();
        let label_style = TextStyle::from((FONT, AXIS_FONT_SIZE).into_font())
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Center));
        label_strip.draw(&Text::new(
            self.y_label(),
            ((Y_LABEL_STRIP / 2) as i32, (height / 2) as i32),
            label_style,
        ))?;

        let heights = self.panel_heights(plot_area.dim_in_pixel().1);
        let panel_count = heights.len();
        let mut remaining = plot_area;
        for (i, (interval, panel_height)) in self.breaks.iter().rev().zip(heights).enumerate() {
            let bottom = i + 1 == panel_count;
            let (panel, rest) = remaining.split_vertically(panel_height);
            self.draw_panel(&panel, interval, i == 0, bottom)?;
            let (_, rest) = rest.split_vertically(PANEL_GAP);
            remaining = rest;
        }

        Ok(())
    }
}

/// `[0, 1.05 * max]` over every finite value of every approach.
///
/// # Errors
///
/// Returns [`Error::NoFiniteSamples`] if no value is finite.
pub fn default_interval(rmses: &[(&str, &[f64])]) -> Result<AxisInterval> {
    let max = rmses
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .filter(|v| v.is_finite())
        .reduce(f64::max)
        .ok_or(Error::NoFiniteSamples)?;

    if max > 0.0 {
        AxisInterval::new(0.0, max * DEFAULT_HEADROOM)
    } else {
        AxisInterval::new(0.0, 1.0)
    }
}

#[allow(clippy::cast_possible_wrap)]
fn draw_markers<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    series: &RmseSeries,
    points: &[(f64, f64)],
    with_legend: bool,
) -> Result<()> {
    let r = series.marker.radius_px() as i32;
    let color = series.color;
    let stroke = color.stroke_width(2);
    let fill = color.filled();
    let name = series.name.as_str();

    match series.marker.shape() {
        MarkerShape::Cross => {
            let anno = chart.draw_series(points.iter().map(|&p| Cross::new(p, r, stroke)))?;
            if with_legend {
                anno.label(name).legend(move |c| Cross::new(c, r, stroke));
            }
        }
        MarkerShape::Circle => {
            let anno = chart.draw_series(points.iter().map(|&p| Circle::new(p, r, fill)))?;
            if with_legend {
                anno.label(name).legend(move |c| Circle::new(c, r, fill));
            }
        }
        MarkerShape::Triangle => {
            let anno =
                chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, r, fill)))?;
            if with_legend {
                anno.label(name)
                    .legend(move |c| TriangleMarker::new(c, r, fill));
            }
        }
        MarkerShape::Plus => {
            let anno = chart.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p)
                    + PathElement::new(vec![(-r, 0), (r, 0)], stroke)
                    + PathElement::new(vec![(0, -r), (0, r)], stroke)
            }))?;
            if with_legend {
                anno.label(name).legend(move |c| {
                    EmptyElement::at(c)
                        + PathElement::new(vec![(-r, 0), (r, 0)], stroke)
                        + PathElement::new(vec![(0, -r), (0, r)], stroke)
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(low: f64, high: f64) -> AxisInterval {
        AxisInterval::new(low, high).unwrap()
    }

    #[test]
    fn test_default_interval_ignores_infinity() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, f64::INFINITY];
        let iv =
            default_interval(&[("X", x.as_slice()), ("Y", y.as_slice())]).unwrap();
        assert!((iv.low() - 0.0).abs() < f64::EPSILON);
        assert!((iv.high() - 1.05 * 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_interval_all_infinite() {
        let y = [f64::INFINITY];
        assert!(matches!(
            default_interval(&[("Y", y.as_slice())]),
            Err(Error::NoFiniteSamples)
        ));
    }

    #[test]
    fn test_build_rejects_unknown_approach() {
        let v = [1.0];
        let err = RmseChart::build(
            ErrorType::TranslAte,
            &[("ObVi-SLAM", v.as_slice()), ("Mystery-SLAM", v.as_slice())],
            &[],
            LegendLocation::UpperLeft,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownApproach(ref n) if n == "Mystery-SLAM"));
    }

    #[test]
    fn test_visible_points_skip_gap_and_infinity() {
        let values = [1.0, 10.0, 20.0, f64::INFINITY];
        let chart = RmseChart::build(
            ErrorType::TranslAte,
            &[("ORB-SLAM3", values.as_slice())],
            &[interval(19.5, 22.0), interval(0.0, 6.0)],
            LegendLocation::UpperLeft,
        )
        .unwrap();

        assert_eq!(chart.trajectory_count(), 4);
        assert_eq!(chart.y_label(), "RMSE (m)");
        let series = &chart.series()[0];
        assert_eq!(series.visible_points(&chart.breaks()[0]), vec![(1.0, 1.0)]);
        assert_eq!(series.visible_points(&chart.breaks()[1]), vec![(3.0, 20.0)]);
    }

    #[test]
    fn test_panel_heights_proportional() {
        let v = [0.5];
        let chart = RmseChart::build(
            ErrorType::OrientAte,
            &[("OA-SLAM", v.as_slice())],
            &[interval(0.0, 0.6), interval(1.0, 1.4)],
            LegendLocation::UpperLeft,
        )
        .unwrap();

        let plot_height = 1000 + PANEL_GAP + X_LABEL_AREA + TOP_MARGIN;
        let heights = chart.panel_heights(plot_height);
        assert_eq!(heights.len(), 2);
        // top panel is the 0.4-wide interval, bottom the 0.6-wide one
        assert_eq!(heights[0], 400 + TOP_MARGIN);
        assert_eq!(heights[1], 600 + X_LABEL_AREA);
        assert_eq!(heights.iter().sum::<u32>() + PANEL_GAP, plot_height);
    }
}

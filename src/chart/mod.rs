//! Chart layout and output
//!
//! Charts are computed as plain layout values first ([`CdfChart`],
//! [`RmseChart`]) and drawn with `plotters` afterwards, so the layout rules
//! (axis limits, styles, clipping) are testable without a drawing backend.
//!
//! A rendered chart goes to exactly one place, chosen by [`ChartOutput`]:
//! a file on disk, or the display. The display is a spawned rerun viewer
//! (default `viewer` feature) and the report waits for Enter after each
//! displayed chart. Builds without the feature, and sinks given a display
//! directory, write displayed charts as PNG files instead.

pub mod cdf;
mod dash;
pub mod rmse;

pub use cdf::{CdfChart, CdfKind, CdfSeries};
pub use dash::dash_polyline;
pub use rmse::{RmseChart, RmseSeries};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::{Error, Result};

/// Font family for all chart text.
pub(crate) const FONT: &str = "sans-serif";
/// Title font size.
pub(crate) const TITLE_FONT_SIZE: u32 = 24;
/// Axis description font size.
pub(crate) const AXIS_FONT_SIZE: u32 = 20;
/// Grid line opacity.
pub(crate) const GRID_ALPHA: f64 = 0.4;

/// Default chart size in pixels.
pub const DEFAULT_CHART_SIZE: (u32, u32) = (1024, 768);

/// Something that can draw itself onto a plotters drawing area.
pub trait Chart {
    /// Short identifier, used for file and viewer entity names.
    fn name(&self) -> &str;

    /// Draw the chart onto `root`, filling it entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the backend fails.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Where a rendered chart goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutput {
    /// Write an image file (SVG for `.svg`, otherwise bitmap by extension)
    Save(PathBuf),
    /// Show the chart instead of saving it
    Display,
}

impl ChartOutput {
    /// `Save` when a path is given, `Display` otherwise.
    #[must_use]
    pub fn from_save_path(path: Option<&Path>) -> Self {
        path.map_or(Self::Display, |p| Self::Save(p.to_path_buf()))
    }
}

/// Where displayed charts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTarget {
    /// A spawned rerun viewer (requires the `viewer` feature)
    Viewer,
    /// PNG files in a directory, path logged
    Directory(PathBuf),
}

impl Default for DisplayTarget {
    #[cfg(feature = "viewer")]
    fn default() -> Self {
        Self::Viewer
    }

    #[cfg(not(feature = "viewer"))]
    fn default() -> Self {
        Self::Directory(std::env::temp_dir())
    }
}

/// Renders charts to their [`ChartOutput`].
///
/// Charts sent to the viewer block until the user presses Enter, so the
/// report moves on one chart at a time.
pub struct ChartSink {
    size: (u32, u32),
    display: DisplayTarget,
    wait_for_user: bool,
    #[cfg(feature = "viewer")]
    viewer: Option<rerun::RecordingStream>,
}

impl fmt::Debug for ChartSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSink")
            .field("size", &self.size)
            .field("display", &self.display)
            .field("wait_for_user", &self.wait_for_user)
            .finish_non_exhaustive()
    }
}

impl ChartSink {
    /// Create a sink rendering charts at `size` pixels.
    #[must_use]
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            display: DisplayTarget::default(),
            wait_for_user: true,
            #[cfg(feature = "viewer")]
            viewer: None,
        }
    }

    /// Write displayed charts as PNG files into `dir` instead of a viewer.
    #[must_use]
    pub fn with_display_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.display = DisplayTarget::Directory(dir.into());
        self
    }

    /// Whether to wait for Enter after each chart shown in the viewer.
    #[must_use]
    pub const fn wait_for_user(mut self, wait: bool) -> Self {
        self.wait_for_user = wait;
        self
    }

    /// Where displayed charts go.
    #[must_use]
    pub const fn display_target(&self) -> &DisplayTarget {
        &self.display
    }

    /// Render `chart` to `output`.
    ///
    /// Returns the path of the written file, or `None` if the chart went to
    /// the interactive viewer.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing, encoding or the viewer fails.
    pub fn emit<C: Chart>(&mut self, chart: &C, output: &ChartOutput) -> Result<Option<PathBuf>> {
        match output {
            ChartOutput::Save(path) => {
                info!(chart = chart.name(), path = %path.display(), "Saving chart");
                self.render_to_file(chart, path)?;
                Ok(Some(path.clone()))
            }
            ChartOutput::Display => match self.display.clone() {
                DisplayTarget::Directory(dir) => self.display_in_dir(chart, &dir).map(Some),
                DisplayTarget::Viewer => {
                    self.show_in_viewer(chart)?;
                    if self.wait_for_user {
                        wait_for_enter(chart.name())?;
                    }
                    Ok(None)
                }
            },
        }
    }

    fn render_to_file<C: Chart>(&self, chart: &C, path: &Path) -> Result<()> {
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            let root = SVGBackend::new(path, self.size).into_drawing_area();
            chart.draw(&root)?;
            root.present()?;
        } else {
            let root = BitMapBackend::new(path, self.size).into_drawing_area();
            chart.draw(&root)?;
            root.present()?;
        }
        Ok(())
    }

    fn display_in_dir<C: Chart>(&self, chart: &C, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.png", chart.name()));
        self.render_to_file(chart, &path)?;
        info!(chart = chart.name(), path = %path.display(), "Chart written for display");
        Ok(path)
    }

    #[cfg(not(feature = "viewer"))]
    fn show_in_viewer<C: Chart>(&mut self, chart: &C) -> Result<()> {
        Err(Error::Viewer(format!(
            "cannot show '{}': built without the `viewer` feature",
            chart.name()
        )))
    }

    #[cfg(feature = "viewer")]
    fn show_in_viewer<C: Chart>(&mut self, chart: &C) -> Result<()> {
        let (width, height) = self.size;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, self.size).into_drawing_area();
            chart.draw(&root)?;
            root.present()?;
        }

        let rec = match self.viewer.take() {
            Some(rec) => rec,
            None => rerun::RecordingStreamBuilder::new("waypoint-eval")
                .spawn()
                .map_err(|e| Error::Viewer(format!("Failed to spawn viewer: {e}")))?,
        };
        let rec = self.viewer.insert(rec);

        info!(chart = chart.name(), "Showing chart in viewer");
        rec.log(
            format!("charts/{}", chart.name()),
            &rerun::Image::from_elements(&buffer, [width, height], rerun::ColorModel::RGB),
        )
        .map_err(|e| Error::Viewer(e.to_string()))?;
        Ok(())
    }
}

fn wait_for_enter(chart: &str) -> Result<()> {
    info!(chart, "Press Enter to continue to the next chart");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}

/// A `[low, high]` slice of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisInterval {
    low: f64,
    high: f64,
}

impl AxisInterval {
    /// Create an interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] unless both bounds are finite and
    /// `low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::InvalidInterval {
                low,
                high,
                reason: "bounds must be finite".to_string(),
            });
        }
        if low >= high {
            return Err(Error::InvalidInterval {
                low,
                high,
                reason: "low must be below high".to_string(),
            });
        }
        Ok(Self { low, high })
    }

    /// Interval from bounds known to be finite and ordered.
    pub(crate) const fn fixed(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Lower bound.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// `high - low`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// Sort break intervals ascending and reject overlaps.
///
/// # Errors
///
/// Returns [`Error::InvalidInterval`] if two intervals overlap.
pub fn sorted_breaks(breaks: &[AxisInterval]) -> Result<Vec<AxisInterval>> {
    let mut sorted = breaks.to_vec();
    sorted.sort_by(|a, b| a.low.total_cmp(&b.low));
    for pair in sorted.windows(2) {
        if pair[1].low < pair[0].high {
            return Err(Error::InvalidInterval {
                low: pair[1].low,
                high: pair[1].high,
                reason: format!("overlaps [{}, {}]", pair[0].low, pair[0].high),
            });
        }
    }
    Ok(sorted)
}

/// Legend placement inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendLocation {
    /// Top left corner
    #[default]
    UpperLeft,
    /// Top edge, centered
    UpperCenter,
    /// Top right corner
    UpperRight,
    /// Left edge, centered
    CenterLeft,
    /// Center
    Center,
    /// Right edge, centered
    CenterRight,
    /// Bottom left corner
    LowerLeft,
    /// Bottom edge, centered
    LowerCenter,
    /// Bottom right corner
    LowerRight,
}

impl FromStr for LegendLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper left" => Ok(Self::UpperLeft),
            "upper center" => Ok(Self::UpperCenter),
            "upper right" => Ok(Self::UpperRight),
            "center left" => Ok(Self::CenterLeft),
            "center" => Ok(Self::Center),
            "center right" | "right" => Ok(Self::CenterRight),
            "lower left" => Ok(Self::LowerLeft),
            "lower center" => Ok(Self::LowerCenter),
            "lower right" => Ok(Self::LowerRight),
            other => Err(Error::InvalidInput(format!("unknown legend location '{other}'"))),
        }
    }
}

impl From<LegendLocation> for SeriesLabelPosition {
    fn from(location: LegendLocation) -> Self {
        match location {
            LegendLocation::UpperLeft => Self::UpperLeft,
            LegendLocation::UpperCenter => Self::UpperMiddle,
            LegendLocation::UpperRight => Self::UpperRight,
            LegendLocation::CenterLeft => Self::MiddleLeft,
            LegendLocation::Center => Self::MiddleMiddle,
            LegendLocation::CenterRight => Self::MiddleRight,
            LegendLocation::LowerLeft => Self::LowerLeft,
            LegendLocation::LowerCenter => Self::LowerMiddle,
            LegendLocation::LowerRight => Self::LowerRight,
        }
    }
}

//! Approach styling
//!
//! Two different rules decide how a series looks:
//!
//! - **Line style is positional.** The primary approach is solid; every other
//!   approach takes the next entry of [`ALTERNATE_LINE_STYLES`] in registry
//!   order. Re-ordering the registry re-assigns line styles.
//! - **Markers are by identity.** RMSE scatter markers come from a closed set
//!   of known approaches ([`ApproachKind`]). Any other name is an
//!   [`Error::UnknownApproach`].
//!
//! Colours follow the matplotlib `tab10` cycle by registry position.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;

use crate::{Error, Result};

/// Known approaches with a fixed marker identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproachKind {
    /// ObVi-SLAM
    ObViSlam,
    /// ORB-SLAM3
    OrbSlam3,
    /// OA-SLAM
    OaSlam,
    /// Pseudo-groundtruth trajectories
    PseudoGroundtruth,
}

impl ApproachKind {
    /// All known approaches.
    pub const ALL: [Self; 4] = [
        Self::ObViSlam,
        Self::OrbSlam3,
        Self::OaSlam,
        Self::PseudoGroundtruth,
    ];

    /// Display name as it appears in the registry.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ObViSlam => "ObVi-SLAM",
            Self::OrbSlam3 => "ORB-SLAM3",
            Self::OaSlam => "OA-SLAM",
            Self::PseudoGroundtruth => "Pseudo-Groundtruth",
        }
    }

    /// Scatter marker for this approach.
    #[must_use]
    pub const fn marker(self) -> MarkerStyle {
        let shape = match self {
            Self::ObViSlam => MarkerShape::Cross,
            Self::OrbSlam3 => MarkerShape::Circle,
            Self::OaSlam => MarkerShape::Plus,
            Self::PseudoGroundtruth => MarkerShape::Triangle,
        };
        MarkerStyle::new(shape, DEFAULT_MARKER_AREA)
    }
}

impl fmt::Display for ApproachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ApproachKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownApproach(s.to_string()))
    }
}

/// Marker area in matplotlib `s` units (points squared).
pub const DEFAULT_MARKER_AREA: u32 = 100;

/// Scatter marker shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Diagonal cross
    Cross,
    /// Filled circle
    Circle,
    /// Upright plus
    Plus,
    /// Filled upward triangle
    Triangle,
}

/// Marker shape and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    shape: MarkerShape,
    area: u32,
}

impl MarkerStyle {
    /// Create a marker style; `area` is in matplotlib `s` units.
    #[must_use]
    pub const fn new(shape: MarkerShape, area: u32) -> Self {
        Self { shape, area }
    }

    /// Marker shape.
    #[must_use]
    pub const fn shape(&self) -> MarkerShape {
        self.shape
    }

    /// Marker area (points squared).
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.area
    }

    /// Half the marker's side length in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn radius_px(&self) -> u32 {
        ((f64::from(self.area).sqrt() / 2.0).round() as u32).max(1)
    }
}

/// Marker for the approach named `name`.
///
/// # Errors
///
/// Returns [`Error::UnknownApproach`] if `name` is not a known approach.
pub fn marker_for(name: &str) -> Result<MarkerStyle> {
    name.parse::<ApproachKind>().map(ApproachKind::marker)
}

/// CDF line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Continuous line
    Solid,
    /// Dots
    Dotted,
    /// Dash, dot
    DashDot,
    /// Dashes
    Dashed,
    /// Long dash, dot (on-off `3,1,1,1`)
    LongDashDot,
    /// Long dash, dot, dot (on-off `3,1,1,1,1,1`)
    LongDashDotDot,
}

impl LineStyle {
    /// On/off dash lengths in units of line width, or `None` for solid.
    #[must_use]
    pub const fn dash_units(self) -> Option<&'static [f64]> {
        match self {
            Self::Solid => None,
            Self::Dotted => Some(&[1.0, 1.65]),
            Self::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
            Self::Dashed => Some(&[3.7, 1.6]),
            Self::LongDashDot => Some(&[3.0, 1.0, 1.0, 1.0]),
            Self::LongDashDotDot => Some(&[3.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        }
    }

    /// On/off dash lengths in pixels for a line `width` pixels wide.
    #[must_use]
    pub fn dash_pattern(self, width: u32) -> Option<Vec<f64>> {
        self.dash_units()
            .map(|units| units.iter().map(|u| u * f64::from(width)).collect())
    }
}

/// Line styles for non-primary approaches, in assignment order.
pub const ALTERNATE_LINE_STYLES: [LineStyle; 5] = [
    LineStyle::Dotted,
    LineStyle::DashDot,
    LineStyle::Dashed,
    LineStyle::LongDashDot,
    LineStyle::LongDashDotDot,
];

/// Assign a line style to each approach in `names` (registry order).
///
/// The primary approach gets [`LineStyle::Solid`]; the others cycle through
/// [`ALTERNATE_LINE_STYLES`] in the order they appear.
#[must_use]
pub fn assign_line_styles<S: AsRef<str>>(names: &[S], primary: &str) -> Vec<LineStyle> {
    let mut alternate = ALTERNATE_LINE_STYLES.iter().copied().cycle();
    names
        .iter()
        .map(|name| {
            if name.as_ref() == primary {
                LineStyle::Solid
            } else {
                alternate.next().unwrap_or(LineStyle::Dotted)
            }
        })
        .collect()
}

const TAB10: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Colour of the series at `index` in registry order.
#[must_use]
pub const fn series_color(index: usize) -> RGBColor {
    TAB10[index % TAB10.len()]
}

//! Empirical CDF from binned samples
//!
//! Samples are binned into `bins` equal-width bins spanning the observed
//! finite range (the last bin is closed on the right), normalised into
//! proportions and accumulated. A leading zero is prepended so the output
//! has one proportion per bin edge.
//!
//! Positive infinity marks a waypoint the approach never localised. Those
//! samples are dropped before binning, so they count in neither the
//! histogram nor the denominator.
//!
//! # Example
//!
//! ```
//! use waypoint_eval::cdf::EmpiricalCdf;
//!
//! let cdf = EmpiricalCdf::from_samples(&[0.0, 1.0, 2.0, 3.0, f64::INFINITY], 3)?;
//! assert_eq!(cdf.edges(), &[0.0, 1.0, 2.0, 3.0]);
//! assert_eq!(cdf.proportions(), &[0.0, 0.25, 0.5, 1.0]);
//! assert_eq!(cdf.max_value(), 3.0);
//! assert_eq!(cdf.dropped_infinite(), 1);
//! # Ok::<(), waypoint_eval::Error>(())
//! ```

use crate::{Error, Result};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 1000;

/// Binned empirical cumulative distribution of a sample series.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalCdf {
    edges: Vec<f64>,
    proportions: Vec<f64>,
    max_value: f64,
    finite_count: usize,
    dropped_infinite: usize,
}

impl EmpiricalCdf {
    /// Build the CDF of `samples` over `bins` bins.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `bins` is zero or a sample is NaN or
    ///   negative infinity
    /// - [`Error::NoFiniteSamples`] if nothing is left after dropping
    ///   positive infinities
    pub fn from_samples(samples: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidInput("bin count must be positive".to_string()));
        }
        let unbinnable = |v: &&f64| v.is_nan() || **v == f64::NEG_INFINITY;
        if let Some(bad) = samples.iter().find(unbinnable) {
            return Err(Error::InvalidInput(format!("cannot bin sample {bad}")));
        }

        let finite: Vec<f64> = samples
            .iter()
            .copied()
            .filter(|v| *v != f64::INFINITY)
            .collect();
        if finite.is_empty() {
            return Err(Error::NoFiniteSamples);
        }

        let (min, max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        // a constant series still needs a non-empty range
        let (lo, hi) = if min < max { (min, max) } else { (min - 0.5, max + 0.5) };

        let edges = bin_edges(lo, hi, bins);
        let counts = histogram(&finite, &edges);

        #[allow(clippy::cast_precision_loss)]
        let total = finite.len() as f64;
        let mut proportions = Vec::with_capacity(bins + 1);
        proportions.push(0.0);
        let mut running = 0.0;
        for count in counts {
            #[allow(clippy::cast_precision_loss)]
            let share = count as f64 / total;
            running += share;
            proportions.push(running);
        }

        Ok(Self {
            edges,
            proportions,
            max_value: max,
            finite_count: finite.len(),
            dropped_infinite: samples.len() - finite.len(),
        })
    }

    /// Bin edges, `bins + 1` values ascending.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Cumulative proportion at each bin edge; starts at 0, ends at 1.
    #[must_use]
    pub fn proportions(&self) -> &[f64] {
        &self.proportions
    }

    /// Largest finite sample.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Number of samples that were binned.
    #[must_use]
    pub const fn finite_count(&self) -> usize {
        self.finite_count
    }

    /// Number of infinite samples dropped before binning.
    #[must_use]
    pub const fn dropped_infinite(&self) -> usize {
        self.dropped_infinite
    }

    /// `(edge, proportion)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.edges.iter().copied().zip(self.proportions.iter().copied())
    }
}

#[allow(clippy::cast_precision_loss)]
fn bin_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| (i as f64).mul_add(step, lo)).collect();
    edges.push(hi);
    edges
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn histogram(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[bins]);
    let mut counts = vec![0usize; bins];
    let scale = bins as f64 / (hi - lo);
    for &v in values {
        let mut idx = (((v - lo) * scale).floor() as usize).min(bins - 1);
        // the scaled index can disagree with the rounded edges by one bin
        if idx > 0 && v < edges[idx] {
            idx -= 1;
        } else if idx < bins - 1 && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }
    counts
}

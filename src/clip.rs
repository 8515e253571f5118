//! Edge clipping for shifted datacubes.
//!
//! After layers of a datacube are shifted, their borders hold wrapped or
//! interpolated data. [`clip_edges`] removes a margin derived from the
//! largest positive and negative shifts along each axis.

use crate::image::datacube::{Datacube, DatacubeView};
use crate::trace::trace_event;

/// Margins removed from each side of the spatial axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipMargins {
    /// Rows removed from the top, from the most negative y shift.
    pub y_lower: usize,
    /// Rows removed from the bottom, from the most positive y shift.
    pub y_upper: usize,
    /// Columns removed from the left, from the most negative x shift.
    pub x_lower: usize,
    /// Columns removed from the right, from the most positive x shift.
    pub x_upper: usize,
}

impl ClipMargins {
    /// Derives margins from per-layer shifts.
    pub fn from_shifts(y: &[f64], x: &[f64]) -> Self {
        Self {
            y_lower: lower_clip(y),
            y_upper: upper_clip(y),
            x_lower: lower_clip(x),
            x_upper: upper_clip(x),
        }
    }
}

/// Largest `ceil(v)` over the non-negative shifts, or 0 if there are none.
pub fn upper_clip(shifts: &[f64]) -> usize {
    ceil_max(shifts.iter().copied().filter(|&v| v >= 0.0))
}

/// Largest `ceil(-v)` over the non-positive shifts, or 0 if there are none.
pub fn lower_clip(shifts: &[f64]) -> usize {
    ceil_max(shifts.iter().filter(|&&v| v <= 0.0).map(|&v| -v))
}

fn ceil_max(values: impl Iterator<Item = f64>) -> usize {
    values
        .map(|v| v.ceil())
        .fold(0.0f64, f64::max)
        .min(usize::MAX as f64) as usize
}

/// Clips the spatial edges of `datacube` according to per-layer shifts.
///
/// Positive shifts clip the upper end of an axis and negative shifts the
/// lower end. The window is `[y_lower, ny - y_upper - 1) x [x_lower, nx - x_upper - 1)`
/// over all layers; the extra `- 1` trims one more row and column at the
/// upper end. Margins larger than the cube give an empty view.
pub fn clip_edges<'a>(datacube: &'a Datacube, y: &[f64], x: &[f64]) -> DatacubeView<'a> {
    let margins = ClipMargins::from_shifts(y, x);
    let (ny, nx, _) = datacube.shape();
    let y_end = ny.saturating_sub(margins.y_upper).saturating_sub(1);
    let x_end = nx.saturating_sub(margins.x_upper).saturating_sub(1);
    trace_event!(
        "clip_edges",
        y_lower = margins.y_lower,
        y_upper = margins.y_upper,
        x_lower = margins.x_lower,
        x_upper = margins.x_upper
    );
    datacube.window(margins.y_lower, y_end, margins.x_lower, x_end)
}

//! Integer peak location and neighborhood extraction.

use crate::image::ImageView;
use crate::util::{CoalignError, CoalignResult};

/// Integer-pixel maximum of a correlation surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the peak.
    pub x: usize,
    /// Y coordinate (row) of the peak.
    pub y: usize,
    /// Surface value at the peak.
    pub score: f64,
}

/// Locates the maximum of `surface`, first in row-major order on ties.
pub fn locate_peak(surface: ImageView<'_, f64>) -> Peak {
    let (x, y) = surface.argmax();
    let score = surface.get(x, y).copied().unwrap_or(f64::NAN);
    Peak { x, y, score }
}

/// Half-open range `[max(0, i - 1), min(i + 2, len - 1))`.
///
/// The upper limit stops one short of the surface edge even when the
/// window would fit; neighborhoods at the far edges are therefore
/// truncated, and a peak on the last row or column falls outside its own
/// neighborhood. Shift results depend on this exact window.
fn clamped_axis(i: usize, len: usize) -> (usize, usize) {
    let start = i.saturating_sub(1);
    let end = (i + 2).min(len.saturating_sub(1));
    (start, end.max(start))
}

/// Returns the at most 3x3 window around `peak` and its `(x, y)` origin.
///
/// # Errors
///
/// Returns [`CoalignError::EmptySurface`] when the clamped window has no
/// rows or columns, which happens for surfaces with a single row or column.
pub fn peak_neighborhood<'a>(
    surface: ImageView<'a, f64>,
    peak: Peak,
) -> CoalignResult<(ImageView<'a, f64>, (usize, usize))> {
    let (y0, y1) = clamped_axis(peak.y, surface.height());
    let (x0, x1) = clamped_axis(peak.x, surface.width());
    if y1 == y0 || x1 == x0 {
        return Err(CoalignError::EmptySurface);
    }
    let window = surface.roi(x0, y0, x1 - x0, y1 - y0)?;
    Ok((window, (x0, y0)))
}

#[cfg(test)]
mod tests {
    use super::{clamped_axis, locate_peak, peak_neighborhood};
    use crate::image::Image;
    use crate::util::CoalignError;

    #[test]
    fn clamped_axis_excludes_last_index() {
        assert_eq!(clamped_axis(0, 5), (0, 2));
        assert_eq!(clamped_axis(2, 5), (1, 4));
        assert_eq!(clamped_axis(3, 5), (2, 4));
        assert_eq!(clamped_axis(4, 5), (3, 4));
        assert_eq!(clamped_axis(0, 1), (0, 0));
    }

    #[test]
    fn locate_peak_reports_position_and_score() {
        let surface = Image::from_fn(5, 4, |x, y| if (x, y) == (3, 1) { 0.9 } else { 0.1 }).unwrap();
        let peak = locate_peak(surface.view());
        assert_eq!((peak.x, peak.y), (3, 1));
        assert_eq!(peak.score, 0.9);
    }

    #[test]
    fn interior_peak_gets_full_window() {
        let surface = Image::from_fn(6, 6, |x, y| (x + 10 * y) as f64).unwrap();
        let peak = locate_peak(surface.view());
        assert_eq!((peak.x, peak.y), (5, 5));

        let interior = super::Peak {
            x: 2,
            y: 2,
            score: 0.0,
        };
        let (window, origin) = peak_neighborhood(surface.view(), interior).unwrap();
        assert_eq!(origin, (1, 1));
        assert_eq!((window.width(), window.height()), (3, 3));
        assert_eq!(window.get(1, 1).copied(), Some(22.0));
    }

    #[test]
    fn edge_peak_window_is_truncated() {
        let surface = Image::zeros(6, 6).unwrap();
        let peak = super::Peak {
            x: 5,
            y: 0,
            score: 0.0,
        };
        let (window, origin) = peak_neighborhood(surface.view(), peak).unwrap();
        assert_eq!(origin, (4, 0));
        assert_eq!((window.width(), window.height()), (1, 2));
    }

    #[test]
    fn single_row_surface_has_no_neighborhood() {
        let surface = Image::zeros(4, 1).unwrap();
        let peak = locate_peak(surface.view());
        assert_eq!(
            peak_neighborhood(surface.view(), peak).err(),
            Some(CoalignError::EmptySurface)
        );
    }
}

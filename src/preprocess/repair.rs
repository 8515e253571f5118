//! Replacement of NaN and infinite samples by local means.

use std::ops::Range;

use crate::image::Image;
use crate::trace::{trace_event, trace_span};
use crate::util::{CoalignError, CoalignResult};

/// Returns the 3-wide window along an axis of length `len` used for index `i`.
///
/// Windows at the first and last index shift one step inward rather than
/// shrinking. Axes shorter than three samples use the whole axis.
fn axis_window(i: usize, len: usize) -> Range<usize> {
    if len < 3 {
        return 0..len;
    }
    let center = i.clamp(1, len - 2);
    center - 1..center + 2
}

/// Mean of the finite samples in the window around `(x, y)`.
fn finite_window_mean(image: &Image, x: usize, y: usize) -> Option<f64> {
    let width = image.width();
    let data = image.data();
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for wy in axis_window(y, image.height()) {
        let row = &data[wy * width..(wy + 1) * width];
        for &value in &row[axis_window(x, width)] {
            if value.is_finite() {
                sum += value;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Replaces every non-finite sample with the mean of the finite samples in
/// its 3x3 neighborhood, in place.
///
/// Pixels are visited in row-major order and each replacement is visible to
/// the pixels after it. Sweeps repeat until no non-finite sample remains, so
/// holes wider than the window fill in from their borders. Returns the number
/// of samples replaced; an already-finite image is left untouched and yields
/// zero.
///
/// # Errors
///
/// Returns [`CoalignError::Unrepairable`] when a sweep replaces nothing while
/// non-finite samples remain, i.e. the image holds no finite value reachable
/// from those samples. The image keeps whatever was repaired before that.
pub fn repair_nonfinite(image: &mut Image) -> CoalignResult<usize> {
    let _span = trace_span!("repair_nonfinite").entered();
    let width = image.width();
    let height = image.height();
    let mut total = 0usize;
    let mut sweeps = 0usize;

    loop {
        let mut repaired = 0usize;
        let mut remaining = 0usize;
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if image.data()[idx].is_finite() {
                    continue;
                }
                match finite_window_mean(image, x, y) {
                    Some(mean) => {
                        image.data_mut()[idx] = mean;
                        repaired += 1;
                    }
                    None => remaining += 1,
                }
            }
        }
        total += repaired;
        sweeps += 1;

        if remaining == 0 {
            trace_event!("repair_done", repaired = total, sweeps = sweeps);
            return Ok(total);
        }
        if repaired == 0 {
            return Err(CoalignError::Unrepairable { remaining });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{axis_window, repair_nonfinite};
    use crate::image::Image;
    use crate::util::CoalignError;

    fn ramp(width: usize, height: usize) -> Image {
        Image::from_fn(width, height, |x, y| (y * width + x) as f64).unwrap()
    }

    #[test]
    fn axis_window_shifts_inward_at_edges() {
        assert_eq!(axis_window(0, 5), 0..3);
        assert_eq!(axis_window(2, 5), 1..4);
        assert_eq!(axis_window(4, 5), 2..5);
        assert_eq!(axis_window(1, 2), 0..2);
    }

    #[test]
    fn finite_image_is_unchanged() {
        let mut img = ramp(5, 4);
        let before = img.clone();
        assert_eq!(repair_nonfinite(&mut img).unwrap(), 0);
        assert_eq!(img, before);
    }

    #[test]
    fn isolated_nan_takes_local_mean() {
        let mut img = ramp(5, 5);
        *img.get_mut(2, 2).unwrap() = f64::NAN;
        assert_eq!(repair_nonfinite(&mut img).unwrap(), 1);
        // Neighbors of 12 in a 5-wide ramp: 6,7,8,11,13,16,17,18.
        let expected = (6.0 + 7.0 + 8.0 + 11.0 + 13.0 + 16.0 + 17.0 + 18.0) / 8.0;
        assert_eq!(img.get(2, 2), Some(expected));
    }

    #[test]
    fn corner_uses_inward_window() {
        let mut img = ramp(4, 4);
        *img.get_mut(0, 0).unwrap() = f64::INFINITY;
        repair_nonfinite(&mut img).unwrap();
        let expected = (1.0 + 2.0 + 4.0 + 5.0 + 6.0 + 8.0 + 9.0 + 10.0) / 8.0;
        assert_eq!(img.get(0, 0), Some(expected));
    }

    #[test]
    fn wide_hole_fills_over_several_sweeps() {
        let mut img = Image::from_fn(7, 7, |_, _| 3.0).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                *img.get_mut(x, y).unwrap() = f64::NAN;
            }
        }
        assert_eq!(repair_nonfinite(&mut img).unwrap(), 25);
        assert_eq!(img.count_nonfinite(), 0);
        assert!(img.data().iter().all(|&v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn replacements_feed_later_pixels_in_the_same_sweep() {
        let mut img = Image::from_fn(5, 5, |x, y| (x + y) as f64).unwrap();
        *img.get_mut(1, 1).unwrap() = f64::INFINITY;
        *img.get_mut(2, 1).unwrap() = f64::NEG_INFINITY;
        *img.get_mut(1, 2).unwrap() = f64::NAN;
        assert_eq!(repair_nonfinite(&mut img).unwrap(), 3);

        // (1, 1): finite neighbors 0, 1, 2, 1, 2, 4.
        let first = (0.0 + 1.0 + 2.0 + 1.0 + 2.0 + 4.0) / 6.0;
        // (2, 1): sees the repaired (1, 1) but not the pending (1, 2).
        let second = (1.0 + 2.0 + 3.0 + first + 4.0 + 4.0 + 5.0) / 7.0;
        // (1, 2): sees both earlier replacements.
        let third = (1.0 + first + second + 2.0 + 4.0 + 3.0 + 4.0 + 5.0) / 8.0;

        assert!((img.get(1, 1).unwrap() - 1.6666666666666667).abs() < 1e-12);
        assert!((img.get(2, 1).unwrap() - 2.9523809523809526).abs() < 1e-12);
        assert!((img.get(1, 1).unwrap() - first).abs() < 1e-12);
        assert!((img.get(2, 1).unwrap() - second).abs() < 1e-12);
        assert!((img.get(1, 2).unwrap() - third).abs() < 1e-12);
        assert_eq!(img.count_nonfinite(), 0);
    }

    #[test]
    fn all_nonfinite_is_reported() {
        let mut img = Image::from_fn(3, 3, |_, _| f64::NAN).unwrap();
        assert_eq!(
            repair_nonfinite(&mut img),
            Err(CoalignError::Unrepairable { remaining: 9 })
        );
    }
}

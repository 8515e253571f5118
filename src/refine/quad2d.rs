//! Separable quadratic refinement on a correlation neighborhood.

use crate::image::ImageView;
use crate::refine::quad1d::parabolic_turning_point;
use crate::trace::trace_warn;
use crate::util::{CoalignError, CoalignResult};

/// Largest neighborhood extent accepted along either axis.
pub const MAX_NEIGHBORHOOD: usize = 3;

/// Estimates the peak of a neighborhood of at most 3x3 correlation values.
///
/// Returns `(y, x)`. Along an axis with exactly three samples the value is
/// the parabolic turning point (relative to the middle sample) of the slice
/// through the neighborhood maximum: its column for `y`, its row for `x`.
/// Along a shorter axis the integer index of the maximum is returned as is.
///
/// # Errors
///
/// Returns [`CoalignError::OversizedNeighborhood`] if either extent exceeds
/// three, after emitting a warning diagnostic.
pub fn correlation_shifts(neighborhood: ImageView<'_, f64>) -> CoalignResult<(f64, f64)> {
    let width = neighborhood.width();
    let height = neighborhood.height();
    if width > MAX_NEIGHBORHOOD || height > MAX_NEIGHBORHOOD {
        let err = CoalignError::OversizedNeighborhood { width, height };
        trace_warn!("{err}; no shift estimated");
        return Err(err);
    }

    let (x_max, y_max) = neighborhood.argmax();
    let at = |x: usize, y: usize| neighborhood.get(x, y).copied().unwrap_or(f64::NAN);

    let y_location = if height == MAX_NEIGHBORHOOD {
        parabolic_turning_point([at(x_max, 0), at(x_max, 1), at(x_max, 2)])
    } else {
        y_max as f64
    };
    let x_location = if width == MAX_NEIGHBORHOOD {
        parabolic_turning_point([at(0, y_max), at(1, y_max), at(2, y_max)])
    } else {
        x_max as f64
    };

    Ok((y_location, x_location))
}

#[cfg(test)]
mod tests {
    use super::correlation_shifts;
    use crate::image::Image;
    use crate::refine::quad1d::parabolic_turning_point;
    use crate::util::CoalignError;

    #[test]
    fn separable_paraboloid_recovers_offsets() {
        let s = Image::from_fn(3, 3, |xi, yi| {
            let (x, y) = (xi as f64 - 1.0, yi as f64 - 1.0);
            1.0 - (x - 0.3).powi(2) - (y + 0.2).powi(2)
        })
        .unwrap();
        let (y, x) = correlation_shifts(s.view()).unwrap();
        assert!((x - 0.3).abs() < 1e-12);
        assert!((y + 0.2).abs() < 1e-12);
    }

    #[test]
    fn slices_pass_through_maximum() {
        #[rustfmt::skip]
        let data = vec![
            0.1, 0.2, 0.3,
            0.2, 0.4, 0.9,
            0.1, 0.3, 0.5,
        ];
        let s = Image::new(data, 3, 3).unwrap();
        let (y, x) = correlation_shifts(s.view()).unwrap();
        assert_eq!(y, parabolic_turning_point([0.3, 0.9, 0.5]));
        assert_eq!(x, parabolic_turning_point([0.2, 0.4, 0.9]));
    }

    #[test]
    fn short_axes_return_integer_maximum() {
        let s = Image::new(vec![0.2, 0.8, 0.1, 0.3, 0.4, 0.35], 3, 2).unwrap();
        let (y, x) = correlation_shifts(s.view()).unwrap();
        assert_eq!(y, 0.0);
        assert_eq!(x, parabolic_turning_point([0.2, 0.8, 0.1]));

        let col = Image::new(vec![0.1, 0.7], 1, 2).unwrap();
        assert_eq!(correlation_shifts(col.view()).unwrap(), (1.0, 0.0));
    }

    #[test]
    fn oversized_neighborhood_is_rejected() {
        let s = Image::zeros(3, 4).unwrap();
        let err = correlation_shifts(s.view()).unwrap_err();
        assert_eq!(
            err,
            CoalignError::OversizedNeighborhood {
                width: 3,
                height: 4
            }
        );
        assert_eq!(
            err.to_string(),
            "neighborhood 3x4 is too big in at least one dimension (max 3x3)"
        );
    }
}

//! Correlation kernels producing normalized correlation surfaces.
//!
//! The [`Correlator`] trait is the seam between shift estimation and the
//! cross-correlation primitive. Any implementation must follow the valid-mode
//! convention: a `w x h` template slid over a `W x H` layer yields a surface
//! of `(W - w + 1) x (H - h + 1)` scores, where entry `(x, y)` scores the
//! placement whose top-left corner sits at layer pixel `(x, y)`.

use crate::image::{Image, ImageView};
use crate::util::{CoalignError, CoalignResult};

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Computes a normalized cross-correlation surface between a layer and a
/// template.
///
/// Inputs must already be finite; see [`crate::preprocess::repair_nonfinite`].
pub trait Correlator {
    /// Correlates `template` against every valid placement inside `layer`.
    fn correlate(
        &self,
        layer: ImageView<'_, f64>,
        template: ImageView<'_, f64>,
    ) -> CoalignResult<Image>;
}

/// Validates that the template is strictly smaller than the layer and returns
/// the surface size as `(width, height)`.
pub fn surface_size(
    layer: ImageView<'_, f64>,
    template: ImageView<'_, f64>,
) -> CoalignResult<(usize, usize)> {
    if template.width() >= layer.width() || template.height() >= layer.height() {
        return Err(CoalignError::TemplateTooLarge {
            tpl_width: template.width(),
            tpl_height: template.height(),
            layer_width: layer.width(),
            layer_height: layer.height(),
        });
    }
    Ok((
        layer.width() - template.width() + 1,
        layer.height() - template.height() + 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::surface_size;
    use crate::image::Image;
    use crate::util::CoalignError;

    #[test]
    fn surface_size_follows_valid_mode() {
        let layer = Image::zeros(10, 8).unwrap();
        let tpl = Image::zeros(4, 3).unwrap();
        assert_eq!(surface_size(layer.view(), tpl.view()).unwrap(), (7, 6));
    }

    #[test]
    fn equal_sized_template_is_rejected() {
        let layer = Image::zeros(5, 5).unwrap();
        let tpl = Image::zeros(5, 2).unwrap();
        assert!(matches!(
            surface_size(layer.view(), tpl.view()),
            Err(CoalignError::TemplateTooLarge { .. })
        ));
    }
}

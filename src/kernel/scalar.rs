//! Scalar reference kernel for zero-normalized cross-correlation.

use crate::image::{Image, ImageView};
use crate::kernel::{surface_size, Correlator};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::CoalignResult;

/// Sequential ZNCC correlator.
///
/// Scores are `sum((I - mean_I)(T - mean_T)) / sqrt(sum((I - mean_I)^2) * sum((T - mean_T)^2))`
/// over each placement. Placements whose denominator is at most
/// `f64::EPSILON` (flat windows or a flat template) score zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZnccScalar;

/// Scores one placement with its top-left corner at `(x, y)`.
///
/// The caller guarantees the placement lies inside `layer`.
pub(crate) fn score_at(layer: ImageView<'_, f64>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
    let tpl_width = plan.width();
    let t_prime = plan.zero_mean();

    let mut dot = 0.0f64;
    let mut sum_i = 0.0f64;
    let mut sum_i2 = 0.0f64;
    for ty in 0..plan.height() {
        let Some(img_row) = layer.row(y + ty) else {
            return 0.0;
        };
        let window = &img_row[x..x + tpl_width];
        let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
        for (&value, &t) in window.iter().zip(tpl_row) {
            dot += t * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let n = plan.len() as f64;
    let var_i = (sum_i2 - sum_i * sum_i / n).max(0.0);
    let denom = (var_i * plan.ssd()).sqrt();
    if denom <= f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

impl Correlator for ZnccScalar {
    fn correlate(
        &self,
        layer: ImageView<'_, f64>,
        template: ImageView<'_, f64>,
    ) -> CoalignResult<Image> {
        let _span = trace_span!("zncc_scalar").entered();
        let (out_width, out_height) = surface_size(layer, template)?;
        let plan = TemplatePlan::from_view(template)?;

        let surface = Image::from_fn(out_width, out_height, |x, y| score_at(layer, &plan, x, y))?;
        trace_event!("surface", width = out_width, height = out_height);
        Ok(surface)
    }
}

//! Rayon-parallel correlation kernel (feature-gated).
//!
//! Rows of the surface are scored in parallel with the same per-placement
//! arithmetic as the scalar kernel, so both produce identical surfaces.

use crate::image::{Image, ImageView};
use crate::kernel::scalar::score_at;
use crate::kernel::{surface_size, Correlator};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::CoalignResult;
use rayon::prelude::*;

/// Row-parallel ZNCC correlator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZnccParallel;

impl Correlator for ZnccParallel {
    fn correlate(
        &self,
        layer: ImageView<'_, f64>,
        template: ImageView<'_, f64>,
    ) -> CoalignResult<Image> {
        let _span = trace_span!("zncc_parallel").entered();
        let (out_width, out_height) = surface_size(layer, template)?;
        let plan = TemplatePlan::from_view(template)?;

        let mut data = vec![0.0f64; out_width * out_height];
        data.par_chunks_mut(out_width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, score) in row.iter_mut().enumerate() {
                    *score = score_at(layer, &plan, x, y);
                }
            });

        trace_event!("surface", width = out_width, height = out_height);
        Image::new(data, out_width, out_height)
    }
}

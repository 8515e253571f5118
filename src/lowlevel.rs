//! Low-level building blocks for custom alignment pipelines.
//!
//! These expose the individual pipeline stages behind [`crate::ShiftEstimator`]
//! for callers that bring their own correlation surfaces or want to inspect
//! intermediate results.

pub use crate::candidate::{locate_peak, peak_neighborhood, Peak};
pub use crate::clip::{lower_clip, upper_clip};
pub use crate::kernel::scalar::ZnccScalar;
pub use crate::kernel::{surface_size, Correlator};
pub use crate::refine::{correlation_shifts, parabolic_turning_point, MAX_NEIGHBORHOOD};
pub use crate::template::TemplatePlan;

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::ZnccParallel;

/// Computes the normalized correlation surface of `template` over `layer`.
///
/// Both inputs must be finite.
pub fn match_template_to_layer(
    layer: crate::ImageView<'_, f64>,
    template: crate::ImageView<'_, f64>,
) -> crate::CoalignResult<crate::Image> {
    ZnccScalar.correlate(layer, template)
}

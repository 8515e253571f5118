//! Coalign estimates sub-pixel translational shifts between image layers.
//!
//! A template is located inside a larger layer by zero-normalized
//! cross-correlation; the correlation peak is refined with separable
//! parabolic fits. Non-finite samples are repaired beforehand, and a small
//! helper trims datacube edges once layers have been shifted. Row-parallel
//! correlation is available through the `rayon` feature.

pub mod candidate;
pub mod clip;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod preprocess;
pub mod refine;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use clip::{clip_edges, ClipMargins};
pub use crate::image::datacube::{Datacube, DatacubeView};
pub use crate::image::{Image, ImageView};
pub use preprocess::{identity_map, repair_nonfinite, DataMap};
pub use search::{
    calculate_shift, find_best_match_location, EstimatorConfig, Shift, ShiftEstimator,
    ShiftReport,
};
pub use util::{CoalignError, CoalignResult};

//! Shift estimation from template correlation.
//!
//! [`ShiftEstimator`] runs the full pipeline on one layer/template pair:
//! data mapping, non-finite repair, correlation, integer peak search, and
//! sub-pixel refinement. Each call is independent; the estimator holds only
//! its configuration and can be shared across threads.

mod estimate;

pub use estimate::{calculate_shift, find_best_match_location, ShiftEstimator, ShiftReport};

use crate::preprocess::{identity_map, DataMap};
use crate::util::{CoalignError, CoalignResult};

/// Translational offset of the template's best-fit position in a layer.
///
/// Coordinates are in correlation-surface space, which coincides with the
/// top-left corner of the template placement in the layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shift {
    /// Row offset in pixels.
    pub y: f64,
    /// Column offset in pixels.
    pub x: f64,
}

impl Shift {
    /// Returns true when both components are finite.
    ///
    /// Degenerate parabola fits (flat neighborhoods) produce infinite or NaN
    /// components; callers should check this before applying a shift.
    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.x.is_finite()
    }
}

/// Configuration for shift estimation.
#[derive(Clone, Copy, Debug)]
pub struct EstimatorConfig {
    /// Score correlation rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Transform applied to every layer and template sample before repair.
    pub data_map: DataMap,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            data_map: identity_map,
        }
    }
}

impl EstimatorConfig {
    /// Checks that the configuration can run in this build.
    pub fn validate(&self) -> CoalignResult<()> {
        if self.parallel && !cfg!(feature = "rayon") {
            return Err(CoalignError::InvalidConfig {
                reason: "parallel estimation requires the `rayon` feature",
            });
        }
        Ok(())
    }
}

//! Sub-pixel refinement of correlation peaks.

pub mod quad1d;
pub mod quad2d;

pub use quad1d::parabolic_turning_point;
pub use quad2d::{correlation_shifts, MAX_NEIGHBORHOOD};

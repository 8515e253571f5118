//! Peak localization on correlation surfaces.
//!
//! Finds the integer maximum of a surface and carves out the small window
//! around it that feeds sub-pixel refinement.

mod peak;

pub use peak::{locate_peak, peak_neighborhood, Peak};

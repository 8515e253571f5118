//! Input conditioning applied before correlation.
//!
//! Layers and templates pass through a caller-supplied [`DataMap`] and then
//! through [`repair_nonfinite`], which guarantees the correlation kernels only
//! ever see finite samples.

mod repair;

pub use repair::repair_nonfinite;

/// Element-wise transform applied to layer and template samples.
///
/// Plain function pointers keep configs `Copy` and thread-safe.
pub type DataMap = fn(f64) -> f64;

/// Default data map: samples pass through unchanged.
pub fn identity_map(value: f64) -> f64 {
    value
}

/// `ln(1 + v)`, compressing the dynamic range of bright features.
pub fn log1p_map(value: f64) -> f64 {
    value.ln_1p()
}

/// Square-root stretch.
pub fn sqrt_map(value: f64) -> f64 {
    value.sqrt()
}

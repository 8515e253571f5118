//! Error types for coalign.

use thiserror::Error;

/// Result alias for coalign operations.
pub type CoalignResult<T> = std::result::Result<T, CoalignError>;

/// Errors that can occur when estimating shifts or clipping datacubes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CoalignError {
    /// Width or height is zero, or the element count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer holds fewer elements than the shape requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest falls outside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template is not strictly smaller than the layer in both axes.
    #[error(
        "template {tpl_width}x{tpl_height} must be strictly smaller than layer {layer_width}x{layer_height}"
    )]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        layer_width: usize,
        layer_height: usize,
    },
    /// The neighborhood handed to the sub-pixel refiner exceeds 3x3.
    #[error("neighborhood {width}x{height} is too big in at least one dimension (max 3x3)")]
    OversizedNeighborhood { width: usize, height: usize },
    /// A correlation surface or neighborhood has no elements.
    #[error("correlation surface is empty")]
    EmptySurface,
    /// Non-finite pixels remain with no finite value in any of their windows.
    #[error("{remaining} non-finite pixels have no finite neighbors to repair from")]
    Unrepairable { remaining: usize },
    /// The configuration is inconsistent.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Decoding an image file failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}

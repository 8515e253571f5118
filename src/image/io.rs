//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::Image;
use crate::preprocess::DataMap;
use crate::util::{CoalignError, CoalignResult};
use std::path::Path;

/// Converts a grayscale buffer to a floating-point image.
pub fn image_from_gray(img: &image::GrayImage) -> CoalignResult<Image> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Image::from_u8(img.as_raw(), width, height)
}

/// Converts a 16-bit grayscale buffer to a floating-point image.
pub fn image_from_gray16(
    img: &image::ImageBuffer<image::Luma<u16>, Vec<u16>>,
) -> CoalignResult<Image> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.as_raw().iter().map(|&v| f64::from(v)).collect();
    Image::new(data, width, height)
}

/// Converts any decoded image to grayscale, keeping 16-bit depth when present.
pub fn image_from_dynamic(img: &image::DynamicImage) -> CoalignResult<Image> {
    match img {
        image::DynamicImage::ImageLuma16(gray) => image_from_gray16(gray),
        other => image_from_gray(&other.to_luma8()),
    }
}

/// Loads an image from disk as grayscale and applies `data_map` to each sample.
pub fn load_layer<P: AsRef<Path>>(path: P, data_map: DataMap) -> CoalignResult<Image> {
    let img = image::open(path).map_err(|err| CoalignError::ImageIo {
        reason: err.to_string(),
    })?;
    let mut layer = image_from_dynamic(&img)?;
    layer.map_in_place(data_map);
    Ok(layer)
}

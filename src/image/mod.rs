//! Image views, owned rasters, and datacubes.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `Image` is the owned, contiguous `f64` raster used for layers, templates,
//! and correlation surfaces. Indexing is `(x, y)` = `(column, row)`.

use crate::util::{CoalignError, CoalignResult};

pub mod datacube;
#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> CoalignResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> CoalignResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(CoalignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> CoalignResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(CoalignError::InvalidDimensions { width, height });
        }

        let out_of_bounds = CoalignError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(CoalignError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(CoalignError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

impl<T: Copy + PartialOrd> ImageView<'_, T> {
    /// Returns `(x, y)` of the largest element, first in row-major order on ties.
    ///
    /// Elements that are unordered with respect to the running maximum (NaN)
    /// are skipped unless every element is NaN, in which case `(0, 0)` is
    /// returned.
    pub fn argmax(&self) -> (usize, usize) {
        let mut best: Option<(usize, usize, T)> = None;
        for y in 0..self.height {
            let Some(row) = self.row(y) else { break };
            for (x, &value) in row.iter().enumerate() {
                let take = match best {
                    Some((_, _, current)) => value > current,
                    None => value.partial_cmp(&value).is_some(),
                };
                if take {
                    best = Some((x, y, value));
                }
            }
        }
        best.map_or((0, 0), |(x, y, _)| (x, y))
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> CoalignResult<usize> {
    if width == 0 || height == 0 {
        return Err(CoalignError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(CoalignError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(CoalignError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous `f64` raster in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Image {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> CoalignResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(CoalignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(CoalignError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a zero-filled image.
    pub fn zeros(width: usize, height: usize) -> CoalignResult<Self> {
        let len = required_len(width, height, width)?;
        Self::new(vec![0.0; len], width, height)
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> CoalignResult<Self> {
        let len = required_len(width, height, width)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Converts 8-bit samples to floating point.
    pub fn from_u8(data: &[u8], width: usize, height: usize) -> CoalignResult<Self> {
        Self::new(data.iter().map(|&v| f64::from(v)).collect(), width, height)
    }

    /// Copies a (possibly strided) view into a contiguous image.
    pub fn from_view(view: ImageView<'_, f64>) -> CoalignResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(required_len(width, height, width)?);
        for y in 0..height {
            let row = view.row(y).ok_or(CoalignError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the samples in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the samples mutably in row-major order.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_, f64> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the sample at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns a mutable reference to the sample at `(x, y)`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    /// Applies `f` to every sample in place.
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        for value in &mut self.data {
            *value = f(*value);
        }
    }

    /// Counts samples that are NaN or infinite.
    pub fn count_nonfinite(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView};

    #[test]
    fn argmax_prefers_first_on_ties() {
        let data = [0.0, 2.0, 1.0, 2.0];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert_eq!(view.argmax(), (1, 0));
    }

    #[test]
    fn argmax_skips_nan() {
        let data = [f64::NAN, 0.5, 3.0, f64::NAN];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert_eq!(view.argmax(), (0, 1));
    }

    #[test]
    fn from_view_compacts_strided_roi() {
        let img = Image::from_fn(4, 3, |x, y| (y * 4 + x) as f64).unwrap();
        let roi = img.view().roi(1, 1, 2, 2).unwrap();
        let owned = Image::from_view(roi).unwrap();
        assert_eq!(owned.data(), &[5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn new_rejects_oversized_buffer() {
        assert!(Image::new(vec![0.0; 5], 2, 2).is_err());
    }
}

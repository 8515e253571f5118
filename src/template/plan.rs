//! Template statistics precomputed once per correlation pass.

use crate::image::ImageView;
use crate::util::{CoalignError, CoalignResult};

/// Zero-mean template buffer and its sum of squared deviations.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    ssd: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// A constant template has `ssd == 0`; kernels then score every placement
    /// as zero rather than failing.
    pub fn from_view(tpl: ImageView<'_, f64>) -> CoalignResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(CoalignError::InvalidDimensions { width, height })?;

        let mut zero_mean = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(CoalignError::BufferTooSmall {
                needed: (y + 1) * tpl.stride(),
                got: tpl.as_slice().len(),
            })?;
            zero_mean.extend_from_slice(row);
        }

        let mean = zero_mean.iter().sum::<f64>() / count as f64;
        let mut ssd = 0.0f64;
        for value in &mut zero_mean {
            *value -= mean;
            ssd += *value * *value;
        }

        Ok(Self {
            width,
            height,
            mean,
            ssd,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of template samples.
    pub fn len(&self) -> usize {
        self.zero_mean.len()
    }

    /// Returns true if the plan holds no samples.
    pub fn is_empty(&self) -> bool {
        self.zero_mean.is_empty()
    }

    /// Returns the mean template intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn ssd(&self) -> f64 {
        self.ssd
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}

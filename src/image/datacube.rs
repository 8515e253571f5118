//! Three-dimensional stacks of equally sized layers.
//!
//! A `Datacube` has shape `(ny, nx, nt)` and stores samples with `t` varying
//! fastest, then `x`, then `y`. `DatacubeView` is a zero-copy spatial window
//! over all layers of a cube.

use crate::image::Image;
use crate::util::{CoalignError, CoalignResult};

/// Owned `(ny, nx, nt)` stack of `f64` layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Datacube {
    data: Vec<f64>,
    ny: usize,
    nx: usize,
    nt: usize,
}

impl Datacube {
    /// Wraps a buffer laid out as `data[(y * nx + x) * nt + t]`.
    pub fn new(data: Vec<f64>, ny: usize, nx: usize, nt: usize) -> CoalignResult<Self> {
        if ny == 0 || nx == 0 || nt == 0 {
            return Err(CoalignError::InvalidDimensions {
                width: nx,
                height: ny,
            });
        }
        let needed = ny
            .checked_mul(nx)
            .and_then(|v| v.checked_mul(nt))
            .ok_or(CoalignError::InvalidDimensions {
                width: nx,
                height: ny,
            })?;
        if data.len() != needed {
            return Err(CoalignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, ny, nx, nt })
    }

    /// Stacks layers of identical size along the third axis.
    pub fn from_layers(layers: &[Image]) -> CoalignResult<Self> {
        let first = layers.first().ok_or(CoalignError::InvalidDimensions {
            width: 0,
            height: 0,
        })?;
        let (nx, ny, nt) = (first.width(), first.height(), layers.len());
        if let Some(bad) = layers
            .iter()
            .find(|layer| layer.width() != nx || layer.height() != ny)
        {
            return Err(CoalignError::InvalidDimensions {
                width: bad.width(),
                height: bad.height(),
            });
        }

        let mut data = Vec::with_capacity(ny * nx * nt);
        for idx in 0..ny * nx {
            data.extend(layers.iter().map(|layer| layer.data()[idx]));
        }
        Self::new(data, ny, nx, nt)
    }

    /// Returns `(ny, nx, nt)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.ny, self.nx, self.nt)
    }

    /// Returns the raw buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the sample at `(y, x, t)` if it is within bounds.
    pub fn get(&self, y: usize, x: usize, t: usize) -> Option<f64> {
        self.view().get(y, x, t)
    }

    /// Returns a view covering the whole cube.
    pub fn view(&self) -> DatacubeView<'_> {
        DatacubeView {
            cube: self,
            y0: 0,
            x0: 0,
            ny: self.ny,
            nx: self.nx,
        }
    }

    /// Returns a spatial window `[y0, y1) x [x0, x1)` over all layers.
    ///
    /// Upper bounds are clamped to the cube and to the lower bounds, so an
    /// inverted or out-of-range window yields an empty view.
    pub fn window(&self, y0: usize, y1: usize, x0: usize, x1: usize) -> DatacubeView<'_> {
        let y0 = y0.min(self.ny);
        let x0 = x0.min(self.nx);
        let y1 = y1.clamp(y0, self.ny);
        let x1 = x1.clamp(x0, self.nx);
        DatacubeView {
            cube: self,
            y0,
            x0,
            ny: y1 - y0,
            nx: x1 - x0,
        }
    }
}

/// Borrowed spatial window over every layer of a `Datacube`.
#[derive(Clone, Copy, Debug)]
pub struct DatacubeView<'a> {
    cube: &'a Datacube,
    y0: usize,
    x0: usize,
    ny: usize,
    nx: usize,
}

impl DatacubeView<'_> {
    /// Returns `(ny, nx, nt)` of the window.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.ny, self.nx, self.cube.nt)
    }

    /// Returns the `(y, x)` origin of the window inside the parent cube.
    pub fn origin(&self) -> (usize, usize) {
        (self.y0, self.x0)
    }

    /// Returns true when the window has no spatial extent.
    pub fn is_empty(&self) -> bool {
        self.ny == 0 || self.nx == 0
    }

    /// Returns the sample at window coordinates `(y, x, t)`.
    pub fn get(&self, y: usize, x: usize, t: usize) -> Option<f64> {
        if y >= self.ny || x >= self.nx || t >= self.cube.nt {
            return None;
        }
        let idx = ((self.y0 + y) * self.cube.nx + self.x0 + x) * self.cube.nt + t;
        self.cube.data.get(idx).copied()
    }

    /// Copies layer `t` of the window into an `Image`.
    pub fn layer(&self, t: usize) -> CoalignResult<Image> {
        if t >= self.cube.nt {
            return Err(CoalignError::InvalidDimensions {
                width: self.nx,
                height: self.ny,
            });
        }
        let mut data = Vec::with_capacity(self.ny * self.nx);
        for y in 0..self.ny {
            for x in 0..self.nx {
                let idx = ((self.y0 + y) * self.cube.nx + self.x0 + x) * self.cube.nt + t;
                data.push(self.cube.data[idx]);
            }
        }
        Image::new(data, self.nx, self.ny)
    }

    /// Copies the window into a new cube.
    ///
    /// Fails with `InvalidDimensions` when the window is empty.
    pub fn to_owned(&self) -> CoalignResult<Datacube> {
        let nt = self.cube.nt;
        let mut data = Vec::with_capacity(self.ny * self.nx * nt);
        for y in 0..self.ny {
            let start = ((self.y0 + y) * self.cube.nx + self.x0) * nt;
            data.extend_from_slice(&self.cube.data[start..start + self.nx * nt]);
        }
        Datacube::new(data, self.ny, self.nx, nt)
    }
}

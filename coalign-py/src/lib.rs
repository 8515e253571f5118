//! Python bindings for the coalign shift estimation library.
//!
//! Arrays cross the boundary as `float64` numpy arrays indexed `[row, col]`
//! (and `[row, col, layer]` for datacubes). Inputs are copied, so the
//! caller's arrays are never modified.

use std::ffi::CString;

use numpy::{
    PyArray1, PyArray2, PyArray3, PyArrayMethods, PyReadonlyArray2, PyReadonlyArray3,
    PyUntypedArrayMethods,
};
use pyo3::exceptions::{PyRuntimeError, PyUserWarning, PyValueError};
use pyo3::prelude::*;

use coalign::lowlevel::{correlation_shifts, match_template_to_layer as rust_match_template};
use coalign::{CoalignError, Datacube, EstimatorConfig, Image, ShiftEstimator};

/// Convert a CoalignError to a Python exception.
fn to_py_err(err: CoalignError) -> PyErr {
    match err {
        CoalignError::InvalidDimensions { .. }
        | CoalignError::TemplateTooLarge { .. }
        | CoalignError::InvalidConfig { .. } => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Copy a 2D numpy array into an owned image.
fn image_from_array(array: &PyReadonlyArray2<'_, f64>) -> PyResult<Image> {
    let shape = array.shape();
    let height = shape[0];
    let width = shape[1];
    let data: Vec<f64> = array.as_array().iter().copied().collect();
    Image::new(data, width, height).map_err(to_py_err)
}

/// Copy an image into a new 2D numpy array.
fn image_to_array(py: Python<'_>, image: Image) -> PyResult<Bound<'_, PyArray2<f64>>> {
    let (width, height) = (image.width(), image.height());
    PyArray1::from_vec(py, image.into_vec()).reshape([height, width])
}

/// Calculate the pixel shift that puts the template at its best position on
/// the layer.
///
/// Args:
///     this_layer: 2D float64 array (ny x nx)
///     template: 2D float64 array (N x M) with N < ny and M < nx
///     parallel: Score correlation rows in parallel (default: False)
///
/// Returns:
///     (yshift, xshift) tuple of floats
#[pyfunction]
#[pyo3(signature = (this_layer, template, parallel = false))]
fn calculate_shift(
    this_layer: PyReadonlyArray2<'_, f64>,
    template: PyReadonlyArray2<'_, f64>,
    parallel: bool,
) -> PyResult<(f64, f64)> {
    let mut layer = image_from_array(&this_layer)?;
    let mut template = image_from_array(&template)?;
    let estimator = ShiftEstimator::new().with_config(EstimatorConfig {
        parallel,
        ..EstimatorConfig::default()
    });
    let shift = estimator
        .estimate(&mut layer, &mut template)
        .map_err(to_py_err)?;
    Ok((shift.y, shift.x))
}

/// Return a copy of the array with every non-finite entry replaced by the
/// mean of the finite entries in its 3x3 neighborhood.
#[pyfunction]
fn repair_nonfinite<'py>(
    py: Python<'py>,
    z: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let mut image = image_from_array(&z)?;
    coalign::repair_nonfinite(&mut image).map_err(to_py_err)?;
    image_to_array(py, image)
}

/// Normalized cross-correlation surface of the template over the layer.
///
/// Returns:
///     2D float64 array of shape (ny - N + 1, nx - M + 1)
#[pyfunction]
fn match_template_to_layer<'py>(
    py: Python<'py>,
    layer: PyReadonlyArray2<'py, f64>,
    template: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let layer = image_from_array(&layer)?;
    let template = image_from_array(&template)?;
    let surface = rust_match_template(layer.view(), template.view()).map_err(to_py_err)?;
    image_to_array(py, surface)
}

/// Sub-pixel location (y, x) of the peak of a correlation array.
#[pyfunction]
fn find_best_match_location(corr: PyReadonlyArray2<'_, f64>) -> PyResult<(f64, f64)> {
    let surface = image_from_array(&corr)?;
    let shift = coalign::find_best_match_location(surface.view()).map_err(to_py_err)?;
    Ok((shift.y, shift.x))
}

/// Parabolic peak estimate (y, x) of an array of at most 3x3 values.
///
/// Returns (None, None) and emits a UserWarning when the array is larger
/// than 3 in either dimension.
#[pyfunction]
fn get_correlation_shifts(
    py: Python<'_>,
    array: PyReadonlyArray2<'_, f64>,
) -> PyResult<(Option<f64>, Option<f64>)> {
    let neighborhood = image_from_array(&array)?;
    match correlation_shifts(neighborhood.view()) {
        Ok((y, x)) => Ok((Some(y), Some(x))),
        Err(err @ CoalignError::OversizedNeighborhood { .. }) => {
            let message = CString::new(format!("{err}. Returning Nones"))
                .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
            PyErr::warn(py, &py.get_type::<PyUserWarning>(), &message, 1)?;
            Ok((None, None))
        }
        Err(err) => Err(to_py_err(err)),
    }
}

/// Turning point of the parabola through samples at -1, 0 and +1.
#[pyfunction]
fn parabolic_turning_point(y: Vec<f64>) -> PyResult<f64> {
    let samples: [f64; 3] = y
        .try_into()
        .map_err(|_| PyValueError::new_err("expected exactly three samples"))?;
    Ok(coalign::lowlevel::parabolic_turning_point(samples))
}

/// Clip the y and x edges of a (ny, nx, nt) datacube according to per-layer
/// pixel shifts.
#[pyfunction]
fn clip_edges<'py>(
    py: Python<'py>,
    datacube: PyReadonlyArray3<'py, f64>,
    y: Vec<f64>,
    x: Vec<f64>,
) -> PyResult<Bound<'py, PyArray3<f64>>> {
    let shape = datacube.shape();
    let (ny, nx, nt) = (shape[0], shape[1], shape[2]);
    let data: Vec<f64> = datacube.as_array().iter().copied().collect();
    let cube = Datacube::new(data, ny, nx, nt).map_err(to_py_err)?;

    let view = coalign::clip_edges(&cube, &y, &x);
    let (out_ny, out_nx, out_nt) = view.shape();
    let mut out = Vec::with_capacity(out_ny * out_nx * out_nt);
    for yi in 0..out_ny {
        for xi in 0..out_nx {
            for t in 0..out_nt {
                out.push(view.get(yi, xi, t).unwrap_or(f64::NAN));
            }
        }
    }
    PyArray1::from_vec(py, out).reshape([out_ny, out_nx, out_nt])
}

/// Python module for coalign shift estimation.
#[pymodule]
fn _coalign(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_shift, m)?)?;
    m.add_function(wrap_pyfunction!(repair_nonfinite, m)?)?;
    m.add_function(wrap_pyfunction!(match_template_to_layer, m)?)?;
    m.add_function(wrap_pyfunction!(find_best_match_location, m)?)?;
    m.add_function(wrap_pyfunction!(get_correlation_shifts, m)?)?;
    m.add_function(wrap_pyfunction!(parabolic_turning_point, m)?)?;
    m.add_function(wrap_pyfunction!(clip_edges, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

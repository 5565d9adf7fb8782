//! PyO3 bindings for Lambert -> WGS84 coordinate conversion.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::ProjError;
use crate::proj::pipeline::{CancelToken, Reprojector};
use crate::proj::profile::{ProjectionProfile, DEFAULT_PROFILE};

pub(crate) fn proj_err(e: ProjError) -> PyErr {
    match e {
        ProjError::UnknownProfile(_) | ProjError::InvalidParameter(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

/// Build a reprojector; `strict` rejects unknown keys instead of using the default.
pub(crate) fn reprojector(profile: &str, strict: bool) -> PyResult<Reprojector> {
    if strict {
        ProjectionProfile::lookup(profile)
            .map(Reprojector::new)
            .map_err(proj_err)
    } else {
        Ok(Reprojector::for_key(profile))
    }
}

/// Convert one Lambert coordinate to WGS84.
///
/// Args:
///     x: Easting in metres.
///     y: Northing in metres.
///     profile: Preset key ("L93", "RGF93" or "LII").
///     strict: Raise ValueError for an unknown key instead of using "LII".
///
/// Returns:
///     Tuple (longitude, latitude) in degrees.
#[pyfunction]
#[pyo3(signature = (x, y, profile=DEFAULT_PROFILE, strict=false))]
pub fn lambert_to_wgs84(x: f64, y: f64, profile: &str, strict: bool) -> PyResult<(f64, f64)> {
    reprojector(profile, strict)?.convert(x, y).map_err(proj_err)
}

/// Convert arrays of Lambert coordinates to WGS84.
///
/// Args:
///     x: 1D array of eastings.
///     y: 1D array of northings.
///     profile: Preset key ("L93", "RGF93" or "LII").
///     strict: Raise ValueError for an unknown key instead of using "LII".
///
/// Returns:
///     Tuple of (lon, lat) arrays in degrees.
#[pyfunction]
#[pyo3(signature = (x, y, profile=DEFAULT_PROFILE, strict=false))]
#[allow(clippy::type_complexity)]
pub fn transform_points<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    profile: &str,
    strict: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let x_view = x.as_array();
    let y_view = y.as_array();

    let n = x_view.len();
    let y_len = y_view.len();
    if n != y_len {
        return Err(PyValueError::new_err(format!(
            "x and y must have same length, got {} and {}",
            n, y_len
        )));
    }

    let mut coords: Vec<(f64, f64)> = x_view
        .iter()
        .zip(y_view.iter())
        .map(|(&xi, &yi)| (xi, yi))
        .collect();

    let reprojector = reprojector(profile, strict)?;

    let coords = py.detach(move || -> Result<Vec<(f64, f64)>, ProjError> {
        reprojector.convert_batch(&mut coords, &CancelToken::new())?;
        Ok(coords)
    });
    let coords = coords.map_err(proj_err)?;

    let (lons, lats): (Vec<f64>, Vec<f64>) = coords.into_iter().unzip();

    Ok((
        PyArray1::from_owned_array(py, ndarray::Array1::from(lons)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(lats)),
    ))
}

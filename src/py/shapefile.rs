//! PyO3 binding for reading a whole shapefile.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::StreamError;
use crate::geometry::Geometry;
use crate::shp::record::{RecordReader, ShapeRecord};
use crate::shp::stream::FeatureStream;

use super::transform::reprojector;

fn stream_err(e: StreamError) -> PyErr {
    match e {
        StreamError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Read every record of a .shp file.
///
/// Args:
///     path: Path to the .shp file.
///     profile: Optional preset key; when given, coordinates are converted to
///         WGS84 degrees while decoding.
///     strict: Raise on the first record that fails to decode instead of
///         returning it with its "error" field set.
///
/// Returns:
///     List of dicts with keys "record_number", "shape_type", "error" and
///     "geometries" (each a dict with "id", "kind" and "coordinates").
#[pyfunction]
#[pyo3(signature = (path, profile=None, strict=false))]
pub fn read_shapefile<'py>(
    py: Python<'py>,
    path: &str,
    profile: Option<&str>,
    strict: bool,
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    let mut reader = RecordReader::new();
    if let Some(key) = profile {
        reader = reader.with_point_converter(reprojector(key, false)?);
    }
    let path = path.to_string();

    let records = py
        .detach(move || -> Result<Vec<ShapeRecord>, StreamError> {
            let mut stream = FeatureStream::open(&path)?.with_reader(reader);
            if strict {
                return stream.read_all();
            }
            let mut out = Vec::new();
            while let Some(streamed) = stream.next_record()? {
                out.push(streamed.record);
            }
            Ok(out)
        })
        .map_err(stream_err)?;

    records.iter().map(|r| record_dict(py, r)).collect()
}

fn record_dict<'py>(py: Python<'py>, record: &ShapeRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("record_number", record.record_number())?;
    dict.set_item("shape_type", record.type_code())?;
    dict.set_item("error", record.error().map(|e| e.to_string()))?;

    let geometries = record
        .geometries()
        .iter()
        .map(|g| geometry_dict(py, g))
        .collect::<PyResult<Vec<_>>>()?;
    dict.set_item("geometries", geometries)?;
    Ok(dict)
}

fn geometry_dict<'py>(py: Python<'py>, geometry: &Geometry) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", geometry.id().0)?;
    dict.set_item("kind", geometry.kind_name())?;
    let coords: Vec<(f64, f64)> = geometry.points().iter().map(|p| (p.x, p.y)).collect();
    dict.set_item("coordinates", coords)?;
    Ok(dict)
}

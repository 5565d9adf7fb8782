use pyo3::prelude::*;

mod shapefile;
mod transform;

/// Register all Python-visible functions.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(transform::lambert_to_wgs84, m)?)?;
    m.add_function(wrap_pyfunction!(transform::transform_points, m)?)?;
    m.add_function(wrap_pyfunction!(shapefile::read_shapefile, m)?)?;
    Ok(())
}

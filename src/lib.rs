//! Shapefile geometry reader with French Lambert to WGS84 reprojection.
//!
//! [`shp`] decodes `.shp` records into [`geometry::Geometry`] values and
//! [`proj`] converts Lambert planar coordinates to WGS84 degrees.

pub mod error;
pub mod geometry;
pub mod proj;
pub mod shp;

#[cfg(feature = "python")]
mod py;

pub use error::{ProjError, ShapeError, StreamError};
pub use proj::pipeline::{convert, CancelToken, Reprojector};
pub use shp::record::{RecordReader, ShapeRecord};
pub use shp::stream::FeatureStream;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn shapeproj(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}

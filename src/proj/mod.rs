//! Geodesy for the Lambert -> WGS84 conversion.
//!
//! `common` and `datum` hold the stateless math, `lambert_conformal` the
//! projection, `profile` the named parameter sets and `pipeline` the full
//! conversion chain.

pub mod common;
pub mod datum;
pub mod ellipsoid;
pub mod lambert_conformal;
pub mod pipeline;
pub mod profile;

use crate::error::ProjError;

/// A map projection on one source ellipsoid. Angles are radians, planar
/// coordinates metres.
pub trait Projection: Send + Sync {
    /// (lon, lat) -> (X, Y)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// (X, Y) -> (lon, lat) on [`Projection::ellipsoid`]
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// In-place forward conversion; stops at the first failing pair.
    fn forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        coords
            .iter_mut()
            .try_for_each(|c| self.forward(c.0, c.1).map(|out| *c = out))
    }

    /// In-place inverse conversion; stops at the first failing pair.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        coords
            .iter_mut()
            .try_for_each(|c| self.inverse(c.0, c.1).map(|out| *c = out))
    }

    /// Ellipsoid the geographic side of the projection refers to.
    fn ellipsoid(&self) -> &ellipsoid::Ellipsoid;
}

//! Lambert -> WGS84 reprojection chain.
//!
//! planar (X, Y) --inverse Lambert--> (λ, φ) on the source ellipsoid
//!   --+ assumed height--> earth-centred (source frame)
//!   --Helmert--> earth-centred (WGS84 frame)
//!   --iterative inversion--> (λ, φ, h) on WGS84

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::ProjError;
use crate::geometry::Point2D;
use crate::proj::common::{ecef_to_geodetic, geodetic_to_ecef, ConvergenceSettings, Geodetic};
use crate::proj::ellipsoid::WGS84;
use crate::proj::lambert_conformal::LambertConformalConic;
use crate::proj::profile::ProjectionProfile;
use crate::proj::Projection;
use crate::shp::record::{PointConverter, ShapeRecord};

/// Shared flag checked between items of a batch conversion.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Converts planar coordinates of one profile to WGS84 longitude/latitude.
///
/// Holds no mutable state, so one instance can be shared across threads.
#[derive(Clone, Debug)]
pub struct Reprojector {
    profile: ProjectionProfile,
    projection: LambertConformalConic,
    settings: ConvergenceSettings,
}

impl Reprojector {
    pub fn new(profile: ProjectionProfile) -> Self {
        let projection = LambertConformalConic::new(profile.ellipsoid, profile.conic);
        Self {
            profile,
            projection,
            settings: ConvergenceSettings::default(),
        }
    }

    /// Reprojector for a preset key; unknown keys use the default preset.
    pub fn for_key(key: &str) -> Self {
        Self::new(ProjectionProfile::resolve(key))
    }

    pub fn with_settings(mut self, settings: ConvergenceSettings) -> Self {
        self.projection = self.projection.with_settings(settings);
        self.settings = settings;
        self
    }

    pub fn profile(&self) -> &ProjectionProfile {
        &self.profile
    }

    /// Full pipeline, radians in and out; also returns the WGS84 ellipsoidal height.
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<Geodetic, ProjError> {
        let (lon, lat) = self.projection.inverse(x, y)?;

        let ell = self.projection.ellipsoid();
        let source = Geodetic::new(lon, lat, self.profile.height);
        let ecef = geodetic_to_ecef(&source, ell.a, ell.eccentricity());
        let shifted = self.profile.helmert.apply(&ecef);

        ecef_to_geodetic(&shifted, WGS84.a, WGS84.eccentricity(), &self.settings)
    }

    /// `(X, Y)` in metres to `(longitude, latitude)` in degrees.
    pub fn convert(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let g = self.to_wgs84(x, y)?;
        Ok((g.lon.to_degrees(), g.lat.to_degrees()))
    }

    /// Reverse direction: WGS84 degrees plus ellipsoidal height to planar `(X, Y)`.
    pub fn from_wgs84(&self, lon: f64, lat: f64, h: f64) -> Result<(f64, f64), ProjError> {
        let g = Geodetic::new(lon.to_radians(), lat.to_radians(), h);
        let ecef = geodetic_to_ecef(&g, WGS84.a, WGS84.eccentricity());
        let shifted = self.profile.helmert.inverse().apply(&ecef);

        let ell = self.projection.ellipsoid();
        let source = ecef_to_geodetic(&shifted, ell.a, ell.eccentricity(), &self.settings)?;
        self.projection.forward(source.lon, source.lat)
    }

    /// Convert `coords` in place, in parallel.
    ///
    /// Stops at the first failing point or once `cancel` is set; the slice is
    /// then partially converted.
    pub fn convert_batch(
        &self,
        coords: &mut [(f64, f64)],
        cancel: &CancelToken,
    ) -> Result<(), ProjError> {
        coords.par_iter_mut().try_for_each(|c| {
            if cancel.is_cancelled() {
                return Err(ProjError::Cancelled);
            }
            *c = self.convert(c.0, c.1)?;
            Ok(())
        })
    }

    /// Reproject every geometry point of `records` in place, one task per record.
    pub fn reproject_records(
        &self,
        records: &mut [ShapeRecord],
        cancel: &CancelToken,
    ) -> Result<(), ProjError> {
        records.par_iter_mut().try_for_each(|record| {
            if cancel.is_cancelled() {
                return Err(ProjError::Cancelled);
            }
            for geometry in record.geometries_mut() {
                for p in geometry.points_mut() {
                    let (lon, lat) = self.convert(p.x, p.y)?;
                    *p = Point2D::new(lon, lat);
                }
            }
            Ok(())
        })
    }
}

impl PointConverter for Reprojector {
    fn convert_point(&self, x: f64, y: f64) -> Result<Point2D, ProjError> {
        let (lon, lat) = self.convert(x, y)?;
        Ok(Point2D::new(lon, lat))
    }
}

/// One-shot conversion with a preset key, degrees out.
pub fn convert(profile_key: &str, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
    Reprojector::for_key(profile_key).convert(x, y)
}

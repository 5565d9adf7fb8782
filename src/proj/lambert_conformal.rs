//! Lambert Conformal Conic projection in the IGN formulation.
//!
//! The cone is described by its constants `(n, C, Xs, Ys, λc)`: cone exponent,
//! projection constant, projected coordinates of the cone apex and central
//! meridian. They can be given directly or derived from one standard parallel
//! with a scale factor (1SP) or from two standard parallels (2SP).
//!
//! Uses `isometric_latitude`, `latitude_from_isometric`, `prime_vertical_radius`
//! from common.rs.

use std::f64::consts::FRAC_PI_2;

use crate::error::ProjError;
use crate::proj::common::{
    isometric_latitude, latitude_from_isometric, prime_vertical_radius, ConvergenceSettings,
};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

/// Derived constants of a Lambert cone.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConicConstants {
    /// Cone exponent
    pub n: f64,
    /// Projection constant (metres)
    pub c: f64,
    /// Projected X of the cone apex
    pub xs: f64,
    /// Projected Y of the cone apex
    pub ys: f64,
    /// Central meridian (radians)
    pub lambdac: f64,
}

impl ConicConstants {
    /// Constants from a tangent cone with scale factor `k0` on parallel `lat0`.
    ///
    /// `(x0, y0)` are the projected coordinates of the origin `(lon0, lat0)`.
    pub fn tangent(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        lat0: f64,
        k0: f64,
        x0: f64,
        y0: f64,
    ) -> Self {
        let e = ellipsoid.eccentricity();
        let n = lat0.sin();
        let rho0 = k0 * prime_vertical_radius(lat0, ellipsoid.a, e) * (FRAC_PI_2 - lat0).tan();
        let c = rho0 * (n * isometric_latitude(lat0, e)).exp();

        Self {
            n,
            c,
            xs: x0,
            ys: y0 + rho0,
            lambdac: lon0,
        }
    }

    /// Constants from a secant cone through standard parallels `lat1` and `lat2`.
    ///
    /// Undefined when either parallel is ±90°.
    #[allow(clippy::too_many_arguments)]
    pub fn secant(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        lat0: f64,
        lat1: f64,
        lat2: f64,
        x0: f64,
        y0: f64,
    ) -> Self {
        let e = ellipsoid.eccentricity();
        let a = ellipsoid.a;

        let m1 = prime_vertical_radius(lat1, a, e) * lat1.cos();
        let m2 = prime_vertical_radius(lat2, a, e) * lat2.cos();
        let l1 = isometric_latitude(lat1, e);
        let l2 = isometric_latitude(lat2, e);

        let n = (m2 / m1).ln() / (l1 - l2);
        let c = m1 / n * (n * l1).exp();

        // An origin at the pole coincides with the apex.
        let ys = if lat0 != FRAC_PI_2 {
            y0 + c * (-n * isometric_latitude(lat0, e)).exp()
        } else {
            y0
        };

        Self {
            n,
            c,
            xs: x0,
            ys,
            lambdac: lon0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LambertConformalConic {
    ellipsoid: Ellipsoid,
    e: f64,
    consts: ConicConstants,
    settings: ConvergenceSettings,
}

impl LambertConformalConic {
    pub fn new(ellipsoid: Ellipsoid, consts: ConicConstants) -> Self {
        Self {
            e: ellipsoid.eccentricity(),
            ellipsoid,
            consts,
            settings: ConvergenceSettings::default(),
        }
    }

    /// Create a Lambert Conformal Conic with two standard parallels (2SP).
    pub fn new_2sp(
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        lat1: f64,
        lat2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let consts = ConicConstants::secant(
            &ellipsoid,
            lon0,
            lat0,
            lat1,
            lat2,
            false_easting,
            false_northing,
        );
        Self::new(ellipsoid, consts)
    }

    /// Create a Lambert Conformal Conic with one standard parallel (1SP).
    pub fn new_1sp(
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let consts =
            ConicConstants::tangent(&ellipsoid, lon0, lat0, k0, false_easting, false_northing);
        Self::new(ellipsoid, consts)
    }

    pub fn with_settings(mut self, settings: ConvergenceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn constants(&self) -> &ConicConstants {
        &self.consts
    }
}

impl Projection for LambertConformalConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let k = &self.consts;
        let rho = k.c * (-k.n * isometric_latitude(lat, self.e)).exp();
        let gamma = k.n * (lon - k.lambdac);

        let x = k.xs + rho * gamma.sin();
        let y = k.ys - rho * gamma.cos();
        if !(x.is_finite() && y.is_finite()) {
            return Err(ProjError::NonFinite {
                stage: "Lambert forward projection",
            });
        }
        Ok((x, y))
    }

    /// The bearing uses plain `atan`, valid south of the apex. A point on the
    /// central meridian has zero bearing, so the apex maps to (λc, 90°).
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let k = &self.consts;
        let dx = x - k.xs;
        let dy = k.ys - y;

        let rho = dx.hypot(dy);
        let gamma = if dx == 0.0 { 0.0 } else { (dx / dy).atan() };
        let lon = k.lambdac + gamma / k.n;

        let l = -(1.0 / k.n) * (rho / k.c).abs().ln();
        let lat = latitude_from_isometric(l, self.e, &self.settings)?;

        Ok((lon, lat))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}

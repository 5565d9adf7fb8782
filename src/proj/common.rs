//! Geodetic helpers shared by the Lambert projection and the datum pipeline:
//! isometric latitude, prime-vertical radius, geodetic <-> earth-centred
//! conversions.
//!
//! Everything here is a pure function of its arguments. The two fixed-point
//! solvers are bounded by [`ConvergenceSettings`] and report
//! [`ProjError::ConvergenceFailure`] instead of spinning forever.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;

/// Tolerance (radians) on successive latitude iterates.
pub const DEFAULT_EPSILON: f64 = 1e-11;

/// Iteration cap for both solvers. Well-formed inputs converge in under ten.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Stopping rule for the iterative latitude solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceSettings {
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Earth-centred, earth-fixed coordinates (metres).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Geodetic coordinates: longitude and latitude in radians, ellipsoidal height in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geodetic {
    pub lon: f64,
    pub lat: f64,
    pub h: f64,
}

impl Geodetic {
    pub fn new(lon: f64, lat: f64, h: f64) -> Self {
        Self { lon, lat, h }
    }
}

/// Isometric latitude L(φ, e) = ln(tan(π/4 + φ/2) · ((1 − e·sinφ)/(1 + e·sinφ))^(e/2)).
pub fn isometric_latitude(phi: f64, e: f64) -> f64 {
    let esin = e * phi.sin();
    let ratio = ((1.0 - esin) / (1.0 + esin)).powf(e / 2.0);
    ((FRAC_PI_4 + phi / 2.0).tan() * ratio).ln()
}

/// Latitude from isometric latitude, by fixed-point iteration seeded with the
/// spherical solution `2·atan(exp(L)) − π/2`.
pub fn latitude_from_isometric(
    l: f64,
    e: f64,
    settings: &ConvergenceSettings,
) -> Result<f64, ProjError> {
    if l.is_nan() {
        return Err(ProjError::NonFinite {
            stage: "isometric latitude inversion",
        });
    }

    let exp_l = l.exp();
    let mut phi = 2.0 * exp_l.atan() - FRAC_PI_2;

    for _ in 0..settings.max_iterations {
        let esin = e * phi.sin();
        let ratio = ((1.0 + esin) / (1.0 - esin)).powf(e / 2.0);
        let next = 2.0 * (ratio * exp_l).atan() - FRAC_PI_2;

        if !next.is_finite() {
            return Err(ProjError::NonFinite {
                stage: "isometric latitude inversion",
            });
        }
        if (next - phi).abs() < settings.epsilon {
            return Ok(next);
        }
        phi = next;
    }

    Err(ProjError::ConvergenceFailure {
        stage: "isometric latitude inversion",
        iterations: settings.max_iterations,
    })
}

/// Prime-vertical radius of curvature N(φ) = a / sqrt(1 − e²·sin²φ).
pub fn prime_vertical_radius(phi: f64, a: f64, e: f64) -> f64 {
    let s = phi.sin();
    a / (1.0 - e * e * s * s).sqrt()
}

/// Closed-form geodetic -> earth-centred conversion.
pub fn geodetic_to_ecef(g: &Geodetic, a: f64, e: f64) -> Ecef {
    let n = prime_vertical_radius(g.lat, a, e);
    let (sin_lat, cos_lat) = g.lat.sin_cos();
    let (sin_lon, cos_lon) = g.lon.sin_cos();

    Ecef {
        x: (n + g.h) * cos_lat * cos_lon,
        y: (n + g.h) * cos_lat * sin_lon,
        z: (n * (1.0 - e * e) + g.h) * sin_lat,
    }
}

/// Iterative earth-centred -> geodetic conversion.
///
/// Longitude is `atan(Y/X)`, which only covers |λ| < 90°; that is the range
/// of every Lambert zone handled here. Height is recovered from the converged
/// latitude.
pub fn ecef_to_geodetic(
    c: &Ecef,
    a: f64,
    e: f64,
    settings: &ConvergenceSettings,
) -> Result<Geodetic, ProjError> {
    if !(c.x.is_finite() && c.y.is_finite() && c.z.is_finite()) {
        return Err(ProjError::NonFinite {
            stage: "earth-centred to geodetic",
        });
    }

    let e2 = e * e;
    let lon = (c.y / c.x).atan();
    let p = c.x.hypot(c.y);
    let r = (c.x * c.x + c.y * c.y + c.z * c.z).sqrt();

    let mut phi = (c.z / (p * (1.0 - a * e2 / r))).atan();

    for _ in 0..settings.max_iterations {
        let s = phi.sin();
        let k = 1.0 - a * e2 * phi.cos() / (p * (1.0 - e2 * s * s).sqrt());
        let next = (c.z / (p * k)).atan();

        if !next.is_finite() {
            return Err(ProjError::NonFinite {
                stage: "earth-centred to geodetic",
            });
        }
        if (next - phi).abs() < settings.epsilon {
            let h = p / next.cos() - prime_vertical_radius(next, a, e);
            return Ok(Geodetic::new(lon, next, h));
        }
        phi = next;
    }

    Err(ProjError::ConvergenceFailure {
        stage: "earth-centred to geodetic",
        iterations: settings.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::{CLARKE_1880_IGN, WGS84};
    use approx::assert_relative_eq;

    #[test]
    fn test_isometric_latitude_equator() {
        assert_relative_eq!(isometric_latitude(0.0, 0.08), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_isometric_latitude_spherical() {
        // e = 0 reduces to the Mercator ordinate ln(tan(π/4 + φ/2))
        let phi = 0.7;
        let expected = (FRAC_PI_4 + phi / 2.0).tan().ln();
        assert_relative_eq!(isometric_latitude(phi, 0.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_isometric_roundtrip() {
        let e = CLARKE_1880_IGN.eccentricity();
        let settings = ConvergenceSettings::default();
        for deg in [-80.0_f64, -45.0, -10.0, 0.0, 12.5, 42.0, 46.8, 51.0, 85.0] {
            let phi = deg.to_radians();
            let l = isometric_latitude(phi, e);
            let back = latitude_from_isometric(l, e, &settings).unwrap();
            assert_relative_eq!(back, phi, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_inversion_converges_quickly() {
        let tight = ConvergenceSettings {
            epsilon: DEFAULT_EPSILON,
            max_iterations: 20,
        };
        for e in [0.0, 0.02, 0.05, 0.082, 0.1] {
            for l in [-8.0, -3.0, -1.0, -0.2, 0.0, 0.4, 1.0, 2.5, 8.0] {
                assert!(
                    latitude_from_isometric(l, e, &tight).is_ok(),
                    "e={e} L={l} did not converge in 20 iterations"
                );
            }
        }
    }

    #[test]
    fn test_inversion_at_infinite_isometric_latitude() {
        // The cone apex maps to L = +inf, i.e. the north pole.
        let phi = latitude_from_isometric(f64::INFINITY, 0.08, &ConvergenceSettings::default())
            .unwrap();
        assert_relative_eq!(phi, FRAC_PI_2, epsilon = 1e-15);
    }

    #[test]
    fn test_inversion_nan_is_reported() {
        let err = latitude_from_isometric(f64::NAN, 0.08, &ConvergenceSettings::default());
        assert!(matches!(err, Err(ProjError::NonFinite { .. })));
    }

    #[test]
    fn test_iteration_cap_is_enforced() {
        let starved = ConvergenceSettings {
            epsilon: 0.0,
            max_iterations: 3,
        };
        let err = latitude_from_isometric(0.9, 0.08, &starved);
        assert!(matches!(
            err,
            Err(ProjError::ConvergenceFailure { iterations: 3, .. })
        ));
    }

    #[test]
    fn test_prime_vertical_radius() {
        let e = WGS84.eccentricity();
        assert_relative_eq!(prime_vertical_radius(0.0, WGS84.a, e), WGS84.a);
        // At the pole N = a² / b
        let n_pole = prime_vertical_radius(FRAC_PI_2, WGS84.a, e);
        assert_relative_eq!(n_pole, WGS84.a * WGS84.a / WGS84.b, epsilon = 1e-6);
    }

    #[test]
    fn test_geodetic_ecef_roundtrip() {
        let e = WGS84.eccentricity();
        let settings = ConvergenceSettings::default();
        let cases = [
            Geodetic::new(2.35_f64.to_radians(), 48.86_f64.to_radians(), 35.0),
            Geodetic::new((-1.55_f64).to_radians(), 47.22_f64.to_radians(), 0.0),
            Geodetic::new(7.75_f64.to_radians(), 43.1_f64.to_radians(), 1500.0),
        ];
        for g in cases {
            let c = geodetic_to_ecef(&g, WGS84.a, e);
            let back = ecef_to_geodetic(&c, WGS84.a, e, &settings).unwrap();
            assert_relative_eq!(back.lon, g.lon, epsilon = 1e-12);
            assert_relative_eq!(back.lat, g.lat, epsilon = 1e-11);
            assert_relative_eq!(back.h, g.h, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_ecef_on_equator_prime_meridian() {
        let e = WGS84.eccentricity();
        let c = geodetic_to_ecef(&Geodetic::new(0.0, 0.0, 0.0), WGS84.a, e);
        assert_relative_eq!(c.x, WGS84.a);
        assert_relative_eq!(c.y, 0.0);
        assert_relative_eq!(c.z, 0.0);
    }

    #[test]
    fn test_ecef_non_finite_input() {
        let c = Ecef::new(f64::NAN, 0.0, 0.0);
        let err = ecef_to_geodetic(&c, WGS84.a, 0.08, &ConvergenceSettings::default());
        assert!(matches!(err, Err(ProjError::NonFinite { .. })));
    }
}

//! Named Lambert parameter presets.
//!
//! A profile bundles everything the reprojector needs for one source system:
//! the source ellipsoid, the cone constants, the ellipsoidal height assumed
//! for planar input, and the Helmert shift to WGS84.

use crate::error::ProjError;
use crate::proj::datum::Helmert;
use crate::proj::ellipsoid::{Ellipsoid, GRS80};
use crate::proj::lambert_conformal::ConicConstants;

/// Key of the Lambert-93 preset expressed on the NTF frame.
pub const LAMBERT_93: &str = "L93";
/// Key of the RGF93 / Lambert-93 preset with the published constants.
pub const RGF93: &str = "RGF93";
/// Key of the NTF / Lambert zone II preset.
pub const LAMBERT_II: &str = "LII";
/// Preset used for any key that is not recognised.
pub const DEFAULT_PROFILE: &str = LAMBERT_II;

/// Paris meridian east of Greenwich (radians).
const PARIS_MERIDIAN: f64 = 0.040_792_344_33;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionProfile {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    pub conic: ConicConstants,
    /// Ellipsoidal height assumed for the planar input (metres)
    pub height: f64,
    /// Source frame -> WGS84
    pub helmert: Helmert,
}

impl ProjectionProfile {
    /// Lambert-93 cone exponent and apex on the NTF frame: Clarke 1880 (IGN),
    /// Paris meridian and the NTF -> WGS84 shift.
    ///
    /// Longitudes differ from RGF93 / Lambert-93 by more than half a degree;
    /// use [`Self::rgf93`] for coordinates from current French datasets.
    pub fn lambert93() -> Self {
        Self {
            name: LAMBERT_93.to_string(),
            ellipsoid: Ellipsoid::from_eccentricity(6_378_249.2, 0.082_483_256_76),
            conic: ConicConstants {
                n: 0.725_607_765_0,
                c: 11_745_255.426,
                xs: 700_000.0,
                ys: 12_655_612.050,
                lambdac: PARIS_MERIDIAN,
            },
            height: 100.0,
            helmert: Helmert::translation(-168.0, -60.0, 320.0),
        }
    }

    /// RGF93 / Lambert-93. RGF93 is WGS84-compatible, so the shift is zero.
    pub fn rgf93() -> Self {
        Self {
            name: RGF93.to_string(),
            ellipsoid: GRS80,
            conic: ConicConstants {
                n: 0.725_607_765_0,
                c: 11_754_255.426,
                xs: 700_000.0,
                ys: 12_655_612.050,
                lambdac: 3.0_f64.to_radians(),
            },
            height: 100.0,
            helmert: Helmert::default(),
        }
    }

    /// NTF / Lambert zone II on Clarke 1880 (IGN), Paris meridian.
    pub fn lambert2() -> Self {
        Self {
            name: LAMBERT_II.to_string(),
            ellipsoid: Ellipsoid::from_eccentricity(6_378_249.2, 0.082_483_256_76),
            conic: ConicConstants {
                n: 0.728_968_627_4,
                c: 11_745_793.39,
                xs: 600_000.0,
                ys: 6_199_695.768,
                lambdac: PARIS_MERIDIAN,
            },
            height: 100.0,
            helmert: Helmert::translation(-168.0, -60.0, 320.0),
        }
    }

    /// Strict lookup: unknown keys are an error.
    pub fn lookup(name: &str) -> Result<Self, ProjError> {
        match name {
            LAMBERT_93 => Ok(Self::lambert93()),
            RGF93 => Ok(Self::rgf93()),
            LAMBERT_II => Ok(Self::lambert2()),
            other => Err(ProjError::UnknownProfile(other.to_string())),
        }
    }

    /// Lenient lookup: unknown keys resolve to [`DEFAULT_PROFILE`].
    pub fn resolve(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|_| {
            tracing::warn!(profile = name, fallback = DEFAULT_PROFILE, "unknown projection profile");
            Self::lambert2()
        })
    }

    /// Profile for a secant cone defined by two standard parallels.
    #[allow(clippy::too_many_arguments)]
    pub fn from_secant(
        name: impl Into<String>,
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        lat1: f64,
        lat2: f64,
        x0: f64,
        y0: f64,
        height: f64,
        helmert: Helmert,
    ) -> Result<Self, ProjError> {
        for lat in [lat1, lat2] {
            if (lat.abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-12 {
                return Err(ProjError::InvalidParameter(format!(
                    "standard parallel at a pole: {} rad",
                    lat
                )));
            }
        }
        let conic = ConicConstants::secant(&ellipsoid, lon0, lat0, lat1, lat2, x0, y0);
        Ok(Self {
            name: name.into(),
            ellipsoid,
            conic,
            height,
            helmert,
        })
    }

    /// Profile for a tangent cone with scale factor `k0` on `lat0`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_tangent(
        name: impl Into<String>,
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        k0: f64,
        x0: f64,
        y0: f64,
        height: f64,
        helmert: Helmert,
    ) -> Self {
        let conic = ConicConstants::tangent(&ellipsoid, lon0, lat0, k0, x0, y0);
        Self {
            name: name.into(),
            ellipsoid,
            conic,
            height,
            helmert,
        }
    }

    pub fn eccentricity(&self) -> f64 {
        self.ellipsoid.eccentricity()
    }
}

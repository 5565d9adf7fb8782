/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared
    pub e2: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        let b = a * (1.0 - f);
        let e2 = 2.0 * f - f * f;
        Self { a, f, b, e2 }
    }

    /// Build from semi-major axis and first eccentricity, as the Lambert
    /// profiles specify them.
    pub fn from_eccentricity(a: f64, e: f64) -> Self {
        let e2 = e * e;
        let f = 1.0 - (1.0 - e2).sqrt();
        Self {
            a,
            f,
            b: a * (1.0 - f),
            e2,
        }
    }

    /// First eccentricity. `sqrt` is not const, so it is derived on demand.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }
}

/// WGS84, target of every reprojection.
pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);

/// GRS80, the RGF93 ellipsoid under Lambert-93.
pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_222_101);

/// Clarke 1880 (IGN), the NTF ellipsoid under the French Lambert zones.
pub const CLARKE_1880_IGN: Ellipsoid = Ellipsoid::new(6_378_249.2, 1.0 / 293.466_021_293_6);

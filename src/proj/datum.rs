//! Seven-parameter similarity (Helmert) transform between earth-centred frames.
//!
//! Rotations are applied in the small-angle linearised form
//! `V = T + (1 + D)·U + R × U`, which is adequate for sub-arcsecond rotations.

use crate::proj::common::Ecef;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Helmert {
    /// Translations (metres)
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Scale difference (unitless, e.g. 1e-6 for 1 ppm)
    pub d: f64,
    /// Rotations (radians)
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Helmert {
    pub fn new(tx: f64, ty: f64, tz: f64, d: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            tx,
            ty,
            tz,
            d,
            rx,
            ry,
            rz,
        }
    }

    /// Translation-only shift.
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            tx,
            ty,
            tz,
            ..Self::default()
        }
    }

    pub fn apply(&self, u: &Ecef) -> Ecef {
        let k = 1.0 + self.d;
        Ecef {
            x: self.tx + u.x * k + u.z * self.ry - u.y * self.rz,
            y: self.ty + u.y * k + u.x * self.rz - u.z * self.rx,
            z: self.tz + u.z * k + u.y * self.rx - u.x * self.ry,
        }
    }

    /// First-order inverse: every parameter negated.
    ///
    /// Exact for pure translations; for scale and rotation the residual is
    /// second order in the parameters.
    pub fn inverse(&self) -> Helmert {
        Helmert {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            d: -self.d,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }
}

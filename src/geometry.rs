//! Geometry values produced by the shape reader.
//!
//! Every geometry carries a [`GeometryId`] handed out by an injected
//! [`IdSource`] at creation time, so two geometries with identical coordinates
//! are still distinct values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate pair. Raw projected `(X, Y)` before reprojection,
/// `(longitude, latitude)` in degrees after.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lon(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }
}

/// Axis-aligned bounds: (min_x, min_y, max_x, max_y).
///
/// Read straight from the file; `min <= max` is not checked.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Tight bounds of a point set, `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bb.expand(p);
        }
        Some(bb)
    }

    pub fn expand(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// Opaque identity token of a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryId(pub u64);

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out identity tokens. Injected into the reader so ids are deterministic.
pub trait IdSource: Send {
    fn next_id(&mut self) -> GeometryId;
}

/// Monotonic counter starting at 1.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> GeometryId {
        let id = GeometryId(self.next);
        self.next += 1;
        id
    }
}

/// An ordered point sequence: a line, or a ring when held by [`Geometry::Polygon`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    pub id: GeometryId,
    pub points: Vec<Point2D>,
}

/// A geometry produced from one shape record.
///
/// Polygons are ring containers with the same layout as lines; orientation and
/// self-intersection are not enforced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    Point { id: GeometryId, point: Point2D },
    Line(Path),
    Polygon(Path),
}

impl Geometry {
    pub fn id(&self) -> GeometryId {
        match self {
            Geometry::Point { id, .. } => *id,
            Geometry::Line(path) | Geometry::Polygon(path) => path.id,
        }
    }

    pub fn points(&self) -> &[Point2D] {
        match self {
            Geometry::Point { point, .. } => std::slice::from_ref(point),
            Geometry::Line(path) | Geometry::Polygon(path) => &path.points,
        }
    }

    pub fn points_mut(&mut self) -> &mut [Point2D] {
        match self {
            Geometry::Point { point, .. } => std::slice::from_mut(point),
            Geometry::Line(path) | Geometry::Polygon(path) => &mut path.points,
        }
    }

    /// Element name used by KML-style writers.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::Line(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sequential_ids_are_unique_and_ordered() {
        let mut ids = SequentialIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a, GeometryId(1));
        assert_eq!(b, GeometryId(2));

        let mut offset = SequentialIds::starting_at(100);
        assert_eq!(offset.next_id(), GeometryId(100));
    }

    #[test]
    fn test_identity_is_not_value_equality() {
        let mut ids = SequentialIds::new();
        let p = Point2D::new(1.0, 2.0);
        let g1 = Geometry::Point { id: ids.next_id(), point: p };
        let g2 = Geometry::Point { id: ids.next_id(), point: p };
        assert_ne!(g1, g2);
        assert_eq!(g1.points(), g2.points());
    }

    #[test]
    fn test_bounds_from_points() {
        let pts = [
            Point2D::new(2.0, 5.0),
            Point2D::new(-1.0, 7.5),
            Point2D::new(4.0, 6.0),
        ];
        let bb = BoundingBox::from_points(&pts).unwrap();
        assert_relative_eq!(bb.min_x, -1.0);
        assert_relative_eq!(bb.min_y, 5.0);
        assert_relative_eq!(bb.max_x, 4.0);
        assert_relative_eq!(bb.max_y, 7.5);

        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_kind_names() {
        let mut ids = SequentialIds::new();
        let line = Geometry::Line(Path {
            id: ids.next_id(),
            points: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)],
        });
        let poly = Geometry::Polygon(Path {
            id: ids.next_id(),
            points: vec![],
        });
        assert_eq!(line.kind_name(), "LineString");
        assert_eq!(poly.kind_name(), "Polygon");
        assert_eq!(line.points().len(), 2);
        assert!(poly.bounds().is_none());
    }
}

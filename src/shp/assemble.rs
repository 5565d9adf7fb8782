//! Slices a record's flat point array into parts.

use crate::error::ShapeError;
use crate::geometry::{Geometry, IdSource, Path, Point2D};

/// Split `points` into one geometry per part index.
///
/// Part `i` covers `[parts[i], parts[i + 1])`, the last one runs to the end of
/// the array. A single part takes every point without slicing. Indices are not
/// checked for order; a slice that falls outside the array is reported as
/// [`ShapeError::PartIndexOutOfRange`]. `wrap` chooses the geometry variant
/// (`Geometry::Line` or `Geometry::Polygon`).
pub fn assemble_parts(
    points: Vec<Point2D>,
    parts: &[i32],
    ids: &mut dyn IdSource,
    wrap: fn(Path) -> Geometry,
) -> Result<Vec<Geometry>, ShapeError> {
    if parts.len() == 1 {
        return Ok(vec![wrap(Path {
            id: ids.next_id(),
            points,
        })]);
    }

    let total = points.len();
    let mut out = Vec::with_capacity(parts.len());

    for (i, &first) in parts.iter().enumerate() {
        let last = parts.get(i + 1).copied().map_or(total as i64, i64::from);
        let (start, end) = (i64::from(first), last);

        let slice = usize::try_from(start)
            .ok()
            .zip(usize::try_from(end).ok())
            .and_then(|(s, e)| points.get(s..e));

        let slice = slice.ok_or(ShapeError::PartIndexOutOfRange {
            part: i,
            start: start.max(0) as usize,
            end: end.max(0) as usize,
            points: total,
        })?;

        out.push(wrap(Path {
            id: ids.next_id(),
            points: slice.to_vec(),
        }));
    }

    Ok(out)
}

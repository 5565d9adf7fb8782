//! ESRI Shapefile (.shp) geometry reading.
//!
//! Only the 2-D shape types are decoded: Null, Point, MultiPoint, PolyLine and
//! Polygon. Every other code is handed to an optional caller-supplied handler.

pub mod assemble;
pub mod header;
pub mod record;
pub mod stream;

/// Shape type codes as stored on disk.
///
/// The `UndefinedN` variants are reserved codes: recognised, but decoded like
/// any other unknown type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    Undefined2 = 2,
    PolyLine = 3,
    Undefined4 = 4,
    Polygon = 5,
    Undefined6 = 6,
    Undefined7 = 7,
    MultiPoint = 8,
}

impl ShapeType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Null),
            1 => Some(Self::Point),
            2 => Some(Self::Undefined2),
            3 => Some(Self::PolyLine),
            4 => Some(Self::Undefined4),
            5 => Some(Self::Polygon),
            6 => Some(Self::Undefined6),
            7 => Some(Self::Undefined7),
            8 => Some(Self::MultiPoint),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_undefined(self) -> bool {
        matches!(
            self,
            Self::Undefined2 | Self::Undefined4 | Self::Undefined6 | Self::Undefined7
        )
    }
}

/// Byte builders for shapefile fixtures.
#[cfg(test)]
pub(crate) mod fixtures {
    use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

    /// Wrap a record body (everything after the type code) with its header.
    pub fn record(number: i32, type_code: i32, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + body.len());
        out.write_i32::<BigEndian>(number).unwrap();
        out.write_i32::<BigEndian>(((4 + body.len()) / 2) as i32).unwrap();
        out.write_i32::<LittleEndian>(type_code).unwrap();
        out.extend_from_slice(body);
        out
    }

    pub fn null_record(number: i32) -> Vec<u8> {
        let mut body = Vec::new();
        body.write_i32::<LittleEndian>(0).unwrap();
        record(number, 0, &body)
    }

    pub fn point_record(number: i32, x: f64, y: f64) -> Vec<u8> {
        let mut body = Vec::new();
        body.write_f64::<LittleEndian>(x).unwrap();
        body.write_f64::<LittleEndian>(y).unwrap();
        record(number, 1, &body)
    }

    fn write_bbox(body: &mut Vec<u8>, pts: &[(f64, f64)]) {
        let min_x = pts.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let min_y = pts.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_x = pts.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = pts.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        for v in [min_x, min_y, max_x, max_y] {
            body.write_f64::<LittleEndian>(v).unwrap();
        }
    }

    pub fn multipoint_record(number: i32, pts: &[(f64, f64)]) -> Vec<u8> {
        let mut body = Vec::new();
        write_bbox(&mut body, pts);
        body.write_i32::<LittleEndian>(pts.len() as i32).unwrap();
        for &(x, y) in pts {
            body.write_f64::<LittleEndian>(x).unwrap();
            body.write_f64::<LittleEndian>(y).unwrap();
        }
        record(number, 8, &body)
    }

    /// PolyLine (3) or Polygon (5) record.
    pub fn parts_record(number: i32, type_code: i32, parts: &[i32], pts: &[(f64, f64)]) -> Vec<u8> {
        let mut body = Vec::new();
        write_bbox(&mut body, pts);
        body.write_i32::<LittleEndian>(parts.len() as i32).unwrap();
        body.write_i32::<LittleEndian>(pts.len() as i32).unwrap();
        for &p in parts {
            body.write_i32::<LittleEndian>(p).unwrap();
        }
        for &(x, y) in pts {
            body.write_f64::<LittleEndian>(x).unwrap();
            body.write_f64::<LittleEndian>(y).unwrap();
        }
        record(number, type_code, &body)
    }

    /// A complete .shp image: 100-byte header followed by `records`.
    pub fn shapefile(shape_type: i32, records: &[Vec<u8>]) -> Vec<u8> {
        let body_len: usize = records.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(100 + body_len);
        out.write_i32::<BigEndian>(9994).unwrap();
        for _ in 0..5 {
            out.write_i32::<BigEndian>(0).unwrap();
        }
        out.write_i32::<BigEndian>(((100 + body_len) / 2) as i32).unwrap();
        out.write_i32::<LittleEndian>(1000).unwrap();
        out.write_i32::<LittleEndian>(shape_type).unwrap();
        for v in [590_000.0, 120_000.0, 610_000.0, 210_000.0] {
            out.write_f64::<LittleEndian>(v).unwrap();
        }
        // Z and M ranges
        for _ in 0..4 {
            out.write_f64::<LittleEndian>(0.0).unwrap();
        }
        for r in records {
            out.extend_from_slice(r);
        }
        out
    }
}

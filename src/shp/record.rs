//! Single-record decoding.
//!
//! Record layout:
//!   int32 BE  record number (1-based)
//!   int32 BE  content length in 16-bit words, including the type code
//!   int32 LE  shape type code
//!   ...       type-specific body, little-endian
//!
//! [`RecordReader::read_record`] never fails: decode errors end up on
//! [`ShapeRecord::error`] and the caller decides whether to skip or abort.

use std::io::{self, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{ProjError, ShapeError};
use crate::geometry::{BoundingBox, Geometry, IdSource, Point2D, SequentialIds};
use crate::shp::assemble::assemble_parts;
use crate::shp::ShapeType;

/// Upper bound on speculative pre-allocation from declared counts.
const MAX_PREALLOC: usize = 1 << 16;

/// Converts raw `(X, Y)` pairs as they are decoded, e.g. a reprojection to WGS84.
pub trait PointConverter: Send + Sync {
    fn convert_point(&self, x: f64, y: f64) -> Result<Point2D, ProjError>;
}

impl<F> PointConverter for F
where
    F: Fn(f64, f64) -> Result<Point2D, ProjError> + Send + Sync,
{
    fn convert_point(&self, x: f64, y: f64) -> Result<Point2D, ProjError> {
        self(x, y)
    }
}

/// Interprets records whose type code is not one of the decoded types.
///
/// Receives the type code, the body length, the raw body bytes (everything
/// after the type code), the reader's id source and the record's geometry
/// list to append to.
pub trait UnknownShapeHandler: Send {
    fn read_unknown(
        &mut self,
        type_code: i32,
        length: usize,
        data: &[u8],
        ids: &mut dyn IdSource,
        geometries: &mut Vec<Geometry>,
    ) -> Result<(), ShapeError>;
}

impl<F> UnknownShapeHandler for F
where
    F: FnMut(i32, usize, &[u8], &mut dyn IdSource, &mut Vec<Geometry>) -> Result<(), ShapeError>
        + Send,
{
    fn read_unknown(
        &mut self,
        type_code: i32,
        length: usize,
        data: &[u8],
        ids: &mut dyn IdSource,
        geometries: &mut Vec<Geometry>,
    ) -> Result<(), ShapeError> {
        self(type_code, length, data, ids, geometries)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_number: i32,
    /// Content length in 16-bit words
    pub content_length: i32,
    pub type_code: i32,
}

impl RecordHeader {
    pub const LEN: u64 = 8;

    /// Content length in bytes, `None` when the stored value is negative.
    pub fn content_bytes(&self) -> Option<u64> {
        u64::try_from(self.content_length).ok().map(|w| w * 2)
    }
}

/// One decoded record.
#[derive(Debug, Default)]
pub struct ShapeRecord {
    header: Option<RecordHeader>,
    bounds: Option<BoundingBox>,
    geometries: Vec<Geometry>,
    error: Option<ShapeError>,
}

impl ShapeRecord {
    /// Header, if all three header fields could be read.
    pub fn header(&self) -> Option<&RecordHeader> {
        self.header.as_ref()
    }

    /// Record number as stored (1-based), 0 if the header was truncated.
    pub fn record_number(&self) -> i32 {
        self.header.map_or(0, |h| h.record_number)
    }

    pub fn type_code(&self) -> Option<i32> {
        self.header.map(|h| h.type_code)
    }

    /// Decoded type, `None` for codes outside 0..=8 or a truncated header.
    pub fn shape_type(&self) -> Option<ShapeType> {
        self.type_code().and_then(ShapeType::from_code)
    }

    /// Bounding box stored in the record body (MultiPoint, PolyLine, Polygon).
    pub fn stored_bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// Bounds computed from the decoded geometries.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.geometries
            .iter()
            .filter_map(Geometry::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub(crate) fn geometries_mut(&mut self) -> &mut [Geometry] {
        &mut self.geometries
    }

    pub fn into_geometries(self) -> Vec<Geometry> {
        self.geometries
    }

    pub fn error(&self) -> Option<&ShapeError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ShapeError> {
        self.error.take()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Counts bytes pulled through a reader.
struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    count: u64,
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Decodes records from a forward-only byte source.
///
/// Holds the injectable hooks and the identity source, so one reader is meant
/// to serve a whole file.
pub struct RecordReader {
    converter: Option<Box<dyn PointConverter>>,
    unknown: Option<Box<dyn UnknownShapeHandler>>,
    ids: Box<dyn IdSource>,
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordReader {
    /// Reader with identity point conversion, no unknown-shape handler and
    /// sequential ids starting at 1.
    pub fn new() -> Self {
        Self {
            converter: None,
            unknown: None,
            ids: Box::new(SequentialIds::new()),
        }
    }

    pub fn with_point_converter(mut self, converter: impl PointConverter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    pub fn on_unknown_shape<F>(mut self, handler: F) -> Self
    where
        F: FnMut(i32, usize, &[u8], &mut dyn IdSource, &mut Vec<Geometry>) -> Result<(), ShapeError>
            + Send
            + 'static,
    {
        self.unknown = Some(Box::new(handler));
        self
    }

    pub fn with_unknown_shape_handler(mut self, handler: impl UnknownShapeHandler + 'static) -> Self {
        self.unknown = Some(Box::new(handler));
        self
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Consume exactly one record from `reader`.
    pub fn read_record<R: Read>(&mut self, reader: &mut R) -> ShapeRecord {
        let mut record = ShapeRecord::default();
        let mut counted = CountingReader {
            inner: reader,
            count: 0,
        };

        if let Err(err) = self.decode(&mut counted, &mut record) {
            tracing::debug!(record = record.record_number(), error = %err, "record decode failed");
            record.error = Some(err);
            return record;
        }

        if let Some(expected) = record.header.and_then(|h| h.content_bytes()) {
            let consumed = counted.count.saturating_sub(RecordHeader::LEN);
            if consumed != expected {
                tracing::debug!(
                    record = record.record_number(),
                    declared = expected,
                    consumed,
                    "content length differs from decoded size"
                );
            }
        }

        record
    }

    fn decode<R: Read>(&mut self, r: &mut R, record: &mut ShapeRecord) -> Result<(), ShapeError> {
        let record_number = r.read_i32::<BigEndian>()?;
        let content_length = r.read_i32::<BigEndian>()?;
        let type_code = r.read_i32::<LittleEndian>()?;
        let header = RecordHeader {
            record_number,
            content_length,
            type_code,
        };
        record.header = Some(header);

        match ShapeType::from_code(type_code) {
            Some(ShapeType::Null) => {
                r.read_i32::<LittleEndian>()?;
            }
            Some(ShapeType::Point) => {
                let point = self.read_point(r)?;
                record.geometries.push(Geometry::Point {
                    id: self.ids.next_id(),
                    point,
                });
            }
            Some(ShapeType::MultiPoint) => {
                record.bounds = Some(read_bbox(r)?);
                record.geometries = self.read_multipoint(r)?;
            }
            Some(ShapeType::PolyLine) => {
                record.bounds = Some(read_bbox(r)?);
                record.geometries = self.read_parts(r, Geometry::Line)?;
            }
            Some(ShapeType::Polygon) => {
                record.bounds = Some(read_bbox(r)?);
                record.geometries = self.read_parts(r, Geometry::Polygon)?;
            }
            _ => self.read_unknown(r, &header, &mut record.geometries)?,
        }

        Ok(())
    }

    fn read_point<R: Read>(&self, r: &mut R) -> Result<Point2D, ShapeError> {
        let x = r.read_f64::<LittleEndian>()?;
        let y = r.read_f64::<LittleEndian>()?;
        match &self.converter {
            Some(c) => Ok(c.convert_point(x, y)?),
            None => Ok(Point2D::new(x, y)),
        }
    }

    fn read_multipoint<R: Read>(&mut self, r: &mut R) -> Result<Vec<Geometry>, ShapeError> {
        let count = read_count(r, "point count")?;
        tracing::debug!(capacity = count, "multipoint started");

        let mut points = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let point = self.read_point(r)?;
            points.push(Geometry::Point {
                id: self.ids.next_id(),
                point,
            });
        }

        tracing::debug!("multipoint ended");
        Ok(points)
    }

    fn read_parts<R: Read>(
        &mut self,
        r: &mut R,
        wrap: fn(crate::geometry::Path) -> Geometry,
    ) -> Result<Vec<Geometry>, ShapeError> {
        let num_parts = read_count(r, "part count")?;
        let num_points = read_count(r, "point count")?;

        let mut parts = Vec::with_capacity(num_parts.min(MAX_PREALLOC));
        for _ in 0..num_parts {
            parts.push(r.read_i32::<LittleEndian>()?);
        }

        let mut points = Vec::with_capacity(num_points.min(MAX_PREALLOC));
        for _ in 0..num_points {
            points.push(self.read_point(r)?);
        }

        assemble_parts(points, &parts, self.ids.as_mut(), wrap)
    }

    fn read_unknown<R: Read>(
        &mut self,
        r: &mut R,
        header: &RecordHeader,
        out: &mut Vec<Geometry>,
    ) -> Result<(), ShapeError> {
        // Body after the type code
        let length = header
            .content_bytes()
            .map_or(0, |b| b.saturating_sub(4)) as usize;
        tracing::debug!(type_code = header.type_code, length, "unknown shape found");

        match self.unknown.as_mut() {
            Some(handler) => {
                // Grows with the bytes actually read, not the declared length.
                let mut data = Vec::with_capacity(length.min(MAX_PREALLOC));
                r.take(length as u64).read_to_end(&mut data)?;
                if data.len() != length {
                    return Err(truncated_body());
                }
                handler.read_unknown(header.type_code, length, &data, self.ids.as_mut(), out)
            }
            None => {
                let skipped = io::copy(&mut r.take(length as u64), &mut io::sink())?;
                if skipped != length as u64 {
                    return Err(truncated_body());
                }
                Ok(())
            }
        }
    }
}

fn truncated_body() -> ShapeError {
    ShapeError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "unknown shape body truncated",
    ))
}

fn read_bbox<R: Read>(r: &mut R) -> Result<BoundingBox, ShapeError> {
    Ok(BoundingBox::new(
        r.read_f64::<LittleEndian>()?,
        r.read_f64::<LittleEndian>()?,
        r.read_f64::<LittleEndian>()?,
        r.read_f64::<LittleEndian>()?,
    ))
}

fn read_count<R: Read>(r: &mut R, field: &'static str) -> Result<usize, ShapeError> {
    let value = r.read_i32::<LittleEndian>()?;
    usize::try_from(value).map_err(|_| ShapeError::NegativeCount { field, value })
}

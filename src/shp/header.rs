//! The fixed 100-byte main file header.

use std::io::Read;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::StreamError;
use crate::geometry::BoundingBox;

/// Size of the main file header; records start right after it.
pub const HEADER_LEN: u64 = 100;

/// Magic number at offset 0.
pub const FILE_CODE: i32 = 9994;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    /// Declared file length in bytes (stored as 16-bit words)
    pub file_length: u64,
    pub version: i32,
    /// Shape type code shared by every non-null record
    pub shape_type_code: i32,
    pub bounds: BoundingBox,
}

impl FileHeader {
    /// Read the header. The reader must be positioned at offset 0 and is left at offset 100.
    pub fn read<R: Read>(r: &mut R) -> Result<Self, StreamError> {
        let code = r.read_i32::<BigEndian>()?;
        if code != FILE_CODE {
            return Err(StreamError::InvalidHeader(format!(
                "file code {code}, expected {FILE_CODE}"
            )));
        }

        // Five unused big-endian integers
        let mut unused = [0u8; 20];
        r.read_exact(&mut unused)?;

        let words = r.read_i32::<BigEndian>()?;
        if words < 0 {
            return Err(StreamError::InvalidHeader(format!(
                "negative file length {words}"
            )));
        }
        let version = r.read_i32::<LittleEndian>()?;
        let shape_type_code = r.read_i32::<LittleEndian>()?;

        let bounds = BoundingBox::new(
            r.read_f64::<LittleEndian>()?,
            r.read_f64::<LittleEndian>()?,
            r.read_f64::<LittleEndian>()?,
            r.read_f64::<LittleEndian>()?,
        );

        // Z and M ranges are not used for 2-D shapes
        let mut zm = [0u8; 32];
        r.read_exact(&mut zm)?;

        Ok(Self {
            file_length: words as u64 * 2,
            version,
            shape_type_code,
            bounds,
        })
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Unknown projection profile: {0}")]
    UnknownProfile(String),

    #[error("{stage} did not converge after {iterations} iterations")]
    ConvergenceFailure {
        stage: &'static str,
        iterations: usize,
    },

    #[error("Non-finite value produced by {stage}")]
    NonFinite { stage: &'static str },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Batch conversion cancelled")]
    Cancelled,
}

/// Failure while decoding a single shape record.
///
/// Stored on [`crate::shp::record::ShapeRecord::error`] rather than returned,
/// so one bad record never stops the surrounding read.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Part {part} spans points {start}..{end} but the record has {points} points")]
    PartIndexOutOfRange {
        part: usize,
        start: usize,
        end: usize,
        points: usize,
    },

    #[error("Negative {field} in record body: {value}")]
    NegativeCount { field: &'static str, value: i32 },

    #[error("Point conversion failed: {0}")]
    PointConversion(#[from] ProjError),

    #[error("Unknown shape handler failed: {0}")]
    Handler(String),
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid shapefile header: {0}")]
    InvalidHeader(String),

    #[error("Feature stream is closed")]
    Closed,

    #[error("Record {record_number} could not be read: {source}")]
    Record {
        record_number: i32,
        #[source]
        source: ShapeError,
    },
}

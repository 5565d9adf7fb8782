//! Forward-only record stream over a whole .shp file.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::StreamError;
use crate::shp::header::{FileHeader, HEADER_LEN};
use crate::shp::record::{RecordHeader, RecordReader, ShapeRecord};

/// Receives `(records_read, consumed_ratio)` while a stream advances.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, records_read: u64, consumed_ratio: f64);
}

impl<F> ProgressObserver for F
where
    F: FnMut(u64, f64) + Send,
{
    fn on_progress(&mut self, records_read: u64, consumed_ratio: f64) {
        self(records_read, consumed_ratio)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamOptions {
    /// Notify the observer every `notify_after` records (0 = every record)
    pub notify_after: u64,
}

/// A record together with the stream progress after reading it.
#[derive(Debug)]
pub struct StreamedRecord {
    pub record: ShapeRecord,
    /// Share of record bytes consumed so far, in `[0, 1]`
    pub consumed_ratio: f64,
}

/// Sequential reader over the records of one shapefile.
///
/// Owns its source exclusively. When the end of data is reached the source is
/// dropped and any further `next_record` or `reset` fails with
/// [`StreamError::Closed`].
pub struct FeatureStream<R: Read + Seek> {
    source: Option<R>,
    header: FileHeader,
    data_len: u64,
    position: u64,
    reader: RecordReader,
    options: StreamOptions,
    observer: Option<Box<dyn ProgressObserver>>,
    records_read: u64,
}

impl FeatureStream<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> FeatureStream<R> {
    /// Parse the main header and position the stream on the first record.
    pub fn new(mut source: R) -> Result<Self, StreamError> {
        source.seek(SeekFrom::Start(0))?;
        let header = FileHeader::read(&mut source)?;

        let data_len = source.seek(SeekFrom::End(0))?;
        if data_len != header.file_length {
            tracing::debug!(
                declared = header.file_length,
                actual = data_len,
                "file length differs from header"
            );
        }
        source.seek(SeekFrom::Start(HEADER_LEN))?;

        Ok(Self {
            source: Some(source),
            header,
            data_len,
            position: HEADER_LEN,
            reader: RecordReader::new(),
            options: StreamOptions::default(),
            observer: None,
            records_read: 0,
        })
    }

    /// Decode records with `reader` (hooks, id source) instead of the default.
    pub fn with_reader(mut self, reader: RecordReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn consumed_ratio(&self) -> f64 {
        if self.data_len <= HEADER_LEN {
            return 1.0;
        }
        let done = self.position.min(self.data_len) - HEADER_LEN;
        done as f64 / (self.data_len - HEADER_LEN) as f64
    }

    /// Go back to the first record.
    pub fn reset(&mut self) -> Result<(), StreamError> {
        let source = self.source.as_mut().ok_or(StreamError::Closed)?;
        source.seek(SeekFrom::Start(HEADER_LEN))?;
        self.position = HEADER_LEN;
        self.records_read = 0;
        Ok(())
    }

    /// Read the next record, or `None` at end of data (which closes the stream).
    ///
    /// A record that fails to decode is still returned, with its error set.
    pub fn next_record(&mut self) -> Result<Option<StreamedRecord>, StreamError> {
        if self.source.is_none() {
            return Err(StreamError::Closed);
        }
        if self.position >= self.data_len {
            tracing::debug!(records = self.records_read, "end of feature stream");
            self.source = None;
            return Ok(None);
        }

        let start = self.position;
        let Some(source) = self.source.as_mut() else {
            return Err(StreamError::Closed);
        };
        let record = self.reader.read_record(source);

        // Frame by the declared length so a bad decode cannot desync the rest.
        let next = match record.header() {
            None => self.data_len,
            Some(h) => match h.content_bytes() {
                Some(bytes) => start + RecordHeader::LEN + bytes,
                None => source.stream_position()?,
            },
        };
        source.seek(SeekFrom::Start(next))?;
        self.position = next;
        self.records_read += 1;

        if let Some(err) = record.error() {
            tracing::warn!(record = record.record_number(), offset = start, error = %err, "record failed to decode");
        }

        let consumed_ratio = self.consumed_ratio();
        tracing::trace!(record = record.record_number(), consumed_ratio, "record read");
        self.notify(consumed_ratio);

        Ok(Some(StreamedRecord {
            record,
            consumed_ratio,
        }))
    }

    /// Read every record from the start; the first failed record aborts the read.
    pub fn read_all(&mut self) -> Result<Vec<ShapeRecord>, StreamError> {
        self.reset()?;
        let mut out = Vec::new();
        while let Some(StreamedRecord { mut record, .. }) = self.next_record()? {
            if let Some(source) = record.take_error() {
                return Err(StreamError::Record {
                    record_number: record.record_number(),
                    source,
                });
            }
            out.push(record);
        }
        Ok(out)
    }

    fn notify(&mut self, consumed_ratio: f64) {
        let every = self.options.notify_after;
        if let Some(observer) = self.observer.as_mut() {
            if every == 0 || self.records_read % every == 0 {
                observer.on_progress(self.records_read, consumed_ratio);
            }
        }
    }
}

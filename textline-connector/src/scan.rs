//! Per-partition scan over line-oriented text files

use std::collections::VecDeque;
use std::path::PathBuf;

use textline_core::{Error, FileStatus, FileSystem, LineReader, Result, RowSource, Schema, TextRow};
use tracing::{debug, warn};

use crate::decoder::RowDecoder;

/// Lazy, forward-only sequence of rows for one partition
///
/// Files are read in lexicographic path order and lines in physical order.
/// Nothing is opened until the first row is requested, and an empty file set
/// yields no rows without touching the file system. To read again, start a
/// new scan.
///
/// The first error ends the scan: every later call fails instead of moving
/// on to the next file.
pub struct TextScan<'fs> {
    /// File-system service used to open files
    fs: &'fs dyn FileSystem,

    /// Schema of the produced rows
    schema: Schema,

    /// Files not yet opened, in scan order
    pending: VecDeque<FileStatus>,

    /// File currently being read
    current: Option<(PathBuf, Box<dyn LineReader>)>,

    /// Lines read from the current file
    current_lines: u64,

    /// Decoder owning the partition's scratch buffer
    decoder: RowDecoder,

    /// Rows produced so far
    rows_read: u64,

    /// An earlier call returned an error
    failed: bool,
}

impl<'fs> TextScan<'fs> {
    /// Create a scan over the files assigned to one partition
    pub fn new(
        fs: &'fs dyn FileSystem,
        schema: Schema,
        mut files: Vec<FileStatus>,
        initial_scratch_size: usize,
    ) -> Self {
        files.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

        Self {
            fs,
            schema,
            pending: files.into(),
            current: None,
            current_lines: 0,
            decoder: RowDecoder::with_capacity(initial_scratch_size),
            rows_read: 0,
            failed: false,
        }
    }

    /// Number of rows produced so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Number of files not yet opened
    pub fn files_remaining(&self) -> usize {
        self.pending.len()
    }

    /// Open the next pending file; false when none are left
    fn open_next(&mut self) -> Result<bool> {
        let Some(status) = self.pending.pop_front() else {
            return Ok(false);
        };

        debug!(path = %status.path.display(), len = status.len, "opening text file");
        let reader = self.fs.open_lines(&status.path)?;
        self.current = Some((status.path, reader));
        self.current_lines = 0;
        Ok(true)
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!(rows_read = self.rows_read, files_remaining = self.pending.len(), error = %err, "text scan failed");
        self.failed = true;
        self.current = None;
        err
    }

    fn finish_current(&mut self) {
        if let Some((path, _)) = self.current.take() {
            debug!(path = %path.display(), lines = self.current_lines, "finished text file");
        }
    }
}

impl RowSource for TextScan<'_> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> Result<Option<TextRow<'_>>> {
        if self.failed {
            return Err(Error::InvalidOperation("scan already failed".into()));
        }

        loop {
            if self.current.is_none() {
                match self.open_next() {
                    Ok(true) => {}
                    Ok(false) => return Ok(None),
                    Err(e) => return Err(self.fail(e)),
                }
            }

            let Some((_, reader)) = self.current.as_mut() else {
                return Ok(None);
            };

            match reader.read_line() {
                Ok(Some(line)) => {
                    self.current_lines += 1;
                    self.rows_read += 1;
                    return Ok(Some(self.decoder.decode(line)));
                }
                Ok(None) => self.finish_current(),
                Err(e) => return Err(self.fail(e.into())),
            }
        }
    }
}

//! Line-record I/O primitives and the file-system service

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TextConf;
use crate::error::Result;

/// A file as reported by the listing service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileStatus {
    /// Location of the file
    pub path: PathBuf,

    /// Size of the file in bytes
    pub len: u64,
}

impl FileStatus {
    /// Create a new file status
    pub fn new<P: Into<PathBuf>>(path: P, len: u64) -> Self {
        Self {
            path: path.into(),
            len,
        }
    }
}

/// Reader that yields one line record at a time
///
/// The returned slice stays valid only until the next call; the reader is
/// free to overwrite it.
pub trait LineReader: Send {
    /// Read the next line without its terminator, or `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<&[u8]>>;
}

/// Writer bound to one output file that appends line records
pub trait LineWriter: Send {
    /// Write the bytes followed by a line terminator
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Flush and release the underlying resource
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// Line reader over any buffered reader
///
/// A record ends at `\n`, `\r\n` or a lone `\r`. A trailing record without a
/// terminator is still a record. After a read error the reader is done: the
/// partly read record is never returned, and every later call fails.
pub struct BufLineReader<R> {
    /// Source of bytes
    inner: R,

    /// Current record, reused across calls
    line: Vec<u8>,

    /// Previous record ended with `\r`; a leading `\n` belongs to it
    skip_lf: bool,

    /// A read failed; the stream position is no longer at a record boundary
    failed: bool,
}

impl<R: BufRead> BufLineReader<R> {
    /// Wrap a buffered reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            skip_lf: false,
            failed: false,
        }
    }
}

impl<R: BufRead + Send> LineReader for BufLineReader<R> {
    fn read_line(&mut self) -> io::Result<Option<&[u8]>> {
        if self.failed {
            return Err(io::Error::other("line reader failed on an earlier read"));
        }

        self.line.clear();
        let mut has_bytes = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.failed = true;
                    return Err(e);
                }
            };

            if available.is_empty() {
                return Ok(if has_bytes { Some(self.line.as_slice()) } else { None });
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    start = 1;
                }
            }

            let rest = &available[start..];
            if let Some(pos) = rest.iter().position(|&b| b == b'\n' || b == b'\r') {
                self.line.extend_from_slice(&rest[..pos]);
                self.skip_lf = rest[pos] == b'\r';
                self.inner.consume(start + pos + 1);
                return Ok(Some(self.line.as_slice()));
            }

            let consumed = available.len();
            self.line.extend_from_slice(rest);
            has_bytes |= !rest.is_empty();
            self.inner.consume(consumed);
        }
    }
}

/// Line writer over any writer, terminating each record with `\n`
pub struct BufLineWriter<W: Write> {
    inner: W,
}

impl<W: Write> BufLineWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Consume the line writer, returning the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> LineWriter for BufLineWriter<W> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.inner.write_all(line)?;
        self.inner.write_all(b"\n")
    }

    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.inner.flush()
    }
}

/// File-system service used by connectors for listing and byte I/O
///
/// Retries on transient failures, if any, belong to implementations; callers
/// propagate errors as returned.
pub trait FileSystem: Send + Sync {
    /// Files backing a path: the file itself, or the data files beneath a directory
    ///
    /// Symbolic links are followed.
    fn list_files(&self, path: &Path) -> Result<Vec<FileStatus>>;

    /// Open a file for line-record reading
    fn open_lines(&self, path: &Path) -> Result<Box<dyn LineReader>>;

    /// Create a new file for line-record writing
    fn create_lines(&self, path: &Path) -> Result<Box<dyn LineWriter>>;
}

/// File system backed by the local disk
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    read_buffer_size: usize,
    write_buffer_size: usize,
}

impl LocalFileSystem {
    /// Create with default buffer sizes
    pub fn new() -> Self {
        Self::from_conf(&TextConf::default())
    }

    /// Create with buffer sizes taken from the connector settings
    pub fn from_conf(conf: &TextConf) -> Self {
        Self {
            read_buffer_size: conf.read_buffer_size().max(1),
            write_buffer_size: conf.write_buffer_size().max(1),
        }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Names starting with `_` or `.` are metadata or hidden files, never data
fn is_data_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| !name.starts_with('_') && !name.starts_with('.'))
}

impl FileSystem for LocalFileSystem {
    fn list_files(&self, path: &Path) -> Result<Vec<FileStatus>> {
        let metadata = fs::metadata(path)?;
        if metadata.is_file() {
            return Ok(vec![FileStatus::new(path, metadata.len())]);
        }

        let mut files = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![path.to_path_buf()];
        while let Some(dir) = pending.pop() {
            // Linked directories can form cycles
            if !visited.insert(fs::canonicalize(&dir)?) {
                continue;
            }

            for entry in fs::read_dir(&dir)? {
                let entry_path = entry?.path();
                if !is_data_name(&entry_path) {
                    continue;
                }

                let metadata = fs::metadata(&entry_path)?;
                if metadata.is_dir() {
                    pending.push(entry_path);
                } else if metadata.is_file() {
                    files.push(FileStatus::new(entry_path, metadata.len()));
                }
            }
        }

        files.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        debug!(path = %path.display(), files = files.len(), "listed directory");
        Ok(files)
    }

    fn open_lines(&self, path: &Path) -> Result<Box<dyn LineReader>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(self.read_buffer_size, file);
        Ok(Box::new(BufLineReader::new(reader)))
    }

    fn create_lines(&self, path: &Path) -> Result<Box<dyn LineWriter>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Refuse to clobber another task's output
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let writer = BufWriter::with_capacity(self.write_buffer_size, file);
        Ok(Box::new(BufLineWriter::new(writer)))
    }
}

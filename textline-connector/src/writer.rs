//! Task-scoped writers producing `part-r-NNNNN` text files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use textline_core::{
    Error, FileSystem, GenericRow, LineWriter, OutputWriter, OutputWriterFactory, Result, Schema,
    TaskAttemptContext, TextRow,
};
use tracing::debug;
use uuid::Uuid;

/// Output file name for a task's split index
///
/// Names are unique per split within one job. Separating attempts of
/// different jobs is left to the job-scoped directory the host writes into.
pub fn output_file_name(split: u32, extension: &str) -> String {
    format!("part-r-{split:05}{extension}")
}

/// Factory for text output writers, prepared once per write job
///
/// The factory is plain data so it can be shipped to the workers running the
/// job's tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOutputWriterFactory {
    /// Job the factory was prepared for
    job_id: Uuid,

    /// Suffix appended to output file names
    extension: String,
}

impl TextOutputWriterFactory {
    /// Create a factory for a job
    pub fn new(job_id: Uuid, extension: &str) -> Self {
        Self {
            job_id,
            extension: extension.to_string(),
        }
    }

    /// Job the factory was prepared for
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Encode the factory for transfer to a worker
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a factory received from the driver
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }

    /// Run one task's writes with a writer that is closed on every exit path
    ///
    /// An error from `body` takes precedence over an error from closing.
    /// Returns the path of the file written.
    pub fn run_task<F>(
        &self,
        fs: &dyn FileSystem,
        dir: &Path,
        schema: &Schema,
        task: &TaskAttemptContext,
        body: F,
    ) -> Result<PathBuf>
    where
        F: FnOnce(&mut TextOutputWriter) -> Result<()>,
    {
        let mut writer = self.new_writer(fs, dir, schema, task)?;
        let outcome = body(&mut writer);
        let closed = writer.close();
        outcome?;
        closed?;
        Ok(writer.path)
    }
}

impl OutputWriterFactory for TextOutputWriterFactory {
    type Writer = TextOutputWriter;

    fn file_extension(&self) -> &str {
        &self.extension
    }

    fn new_writer(
        &self,
        fs: &dyn FileSystem,
        dir: &Path,
        schema: &Schema,
        task: &TaskAttemptContext,
    ) -> Result<TextOutputWriter> {
        if task.job_id() != self.job_id {
            return Err(Error::InvalidArgument(format!(
                "task belongs to job {} but the writer factory was prepared for job {}",
                task.job_id(),
                self.job_id
            )));
        }

        let path = dir.join(output_file_name(task.split(), &self.extension));
        let writer = fs.create_lines(&path)?;
        debug!(path = %path.display(), split = task.split(), attempt = task.attempt(), "created text writer");

        Ok(TextOutputWriter {
            path,
            schema: schema.clone(),
            writer: Some(writer),
            buffer: Vec::new(),
            rows_written: 0,
        })
    }
}

/// Writer for one output task
///
/// Rows are written as their raw text bytes, one per line. Closing flushes
/// and releases the file exactly once. A writer dropped without closing is
/// not closed on the caller's behalf.
pub struct TextOutputWriter {
    /// File this writer produces
    path: PathBuf,

    /// Data schema of the rows being written
    schema: Schema,

    /// Underlying line writer; `None` once closed
    writer: Option<Box<dyn LineWriter>>,

    /// Reusable serialization buffer
    buffer: Vec<u8>,

    /// Rows written so far
    rows_written: u64,
}

impl TextOutputWriter {
    /// Data schema of the rows being written
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Whether the writer has been closed
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl OutputWriter for TextOutputWriter {
    fn write(&mut self, row: &TextRow<'_>) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::InvalidOperation(format!(
                "writer for {} is already closed",
                self.path.display()
            )));
        };

        self.buffer.clear();
        self.buffer.extend_from_slice(row.bytes());
        writer.write_line(&self.buffer)?;
        self.rows_written += 1;
        Ok(())
    }

    fn write_generic(&mut self, _row: &GenericRow) -> Result<()> {
        Err(Error::Unsupported(
            "text writer accepts only internal rows; write through `OutputWriter::write` with a `TextRow`".into(),
        ))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finish()?;
            debug!(path = %self.path.display(), rows = self.rows_written, "closed text writer");
        }
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

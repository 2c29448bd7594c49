//! Output writer traits for task-scoped writes

use std::path::Path;

use crate::error::Result;
use crate::io::FileSystem;
use crate::row::{GenericRow, TextRow};
use crate::schema::Schema;
use crate::task::TaskAttemptContext;

/// Writer owned by one output task
pub trait OutputWriter {
    /// Write an internal row
    fn write(&mut self, row: &TextRow<'_>) -> Result<()>;

    /// Write an externally-visible row
    ///
    /// Writers that only accept internal rows reject this call.
    fn write_generic(&mut self, row: &GenericRow) -> Result<()>;

    /// Flush and release the underlying resource; repeated calls are no-ops
    fn close(&mut self) -> Result<()>;

    /// File this writer produces
    fn path(&self) -> &Path;
}

/// Factory producing one output writer per task attempt
pub trait OutputWriterFactory: Send + Sync {
    /// The type of writer this factory creates
    type Writer: OutputWriter;

    /// Suffix appended to every output file name
    fn file_extension(&self) -> &str;

    /// Create the writer for a task inside `dir`
    fn new_writer(
        &self,
        fs: &dyn FileSystem,
        dir: &Path,
        schema: &Schema,
        task: &TaskAttemptContext,
    ) -> Result<Self::Writer>;
}

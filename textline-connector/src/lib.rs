//! Line-oriented text file connector
//!
//! Exposes plain text files as relations with a single string column named
//! `text`, one row per line. The read path decodes line records into rows
//! through a per-partition scratch buffer; the write path produces one
//! `part-r-NNNNN` file per output task.
//!
//! ```no_run
//! use textline_connector::{RelationProvider, TextFileFormat};
//! use textline_core::{LocalFileSystem, RowSource};
//!
//! # fn main() -> textline_core::Result<()> {
//! let fs = LocalFileSystem::new();
//! let relation = TextFileFormat::default().create_relation(&["/data/logs".to_string()], None, None)?;
//! let files = relation.list_files(&fs)?;
//!
//! let mut scan = relation.scan(&fs, files);
//! while let Some(row) = scan.next_row()? {
//!     println!("{}", row.to_str_lossy());
//! }
//! # Ok(())
//! # }
//! ```

mod decoder;
mod factory;
mod relation;
mod scan;
mod schema;
mod writer;

pub use decoder::{RowDecoder, ScratchBuffer};
pub use factory::{RelationProvider, TextFileFormat};
pub use relation::TextRelation;
pub use scan::TextScan;
pub use schema::{text_schema, verify_schema, TEXT_COLUMN};
pub use writer::{output_file_name, TextOutputWriter, TextOutputWriterFactory};

// Re-export core types
pub use textline_core::{
    Error, FileStatus, FileSystem, JobContext, OutputWriter, OutputWriterFactory, Result, RowSource,
    Schema, TaskAttemptContext, TextConf, TextRow,
};

//! Row, schema and I/O abstractions shared by textline connectors
//!
//! This crate holds the narrow interfaces a connector uses to talk to its host
//! engine: the file-system service and line-record primitives, job and task
//! identities, settings, and the row and schema model.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod io;
pub mod row;
pub mod schema;
pub mod sink;
pub mod source;
pub mod task;

// Re-export key types for convenience
pub use config::{ConfigProvider, MapConfigProvider, TextConf};
pub use error::{Error, Result};
pub use io::{BufLineReader, BufLineWriter, FileStatus, FileSystem, LineReader, LineWriter, LocalFileSystem};
pub use row::{GenericRow, TextRow, Value};
pub use schema::{DataType, Field, Schema};
pub use sink::{OutputWriter, OutputWriterFactory};
pub use source::RowSource;
pub use task::{JobContext, TaskAttemptContext};

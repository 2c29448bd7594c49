//! Row source trait for partition scans

use crate::error::Result;
use crate::row::TextRow;
use crate::schema::Schema;

/// A forward-only source of rows for one partition
///
/// Rows borrow from the source and must be dropped before the next call,
/// which may overwrite them.
pub trait RowSource {
    /// Get the schema of the rows this source produces
    fn schema(&self) -> &Schema;

    /// Retrieve the next row
    /// Returns None when exhausted
    fn next_row(&mut self) -> Result<Option<TextRow<'_>>>;
}

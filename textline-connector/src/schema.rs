//! The connector's fixed data schema and its validation

use textline_core::{DataType, Error, Field, Result, Schema};

/// Name of the single column text rows expose
pub const TEXT_COLUMN: &str = "text";

/// The data schema of every text relation: one string column
pub fn text_schema() -> Schema {
    Schema::new(vec![Field::new(TEXT_COLUMN, DataType::String, false)])
}

/// Check that a caller-supplied schema has exactly one string column
///
/// Only the column count and type are constrained; the column may carry any
/// name.
pub fn verify_schema(schema: &Schema) -> Result<()> {
    if schema.len() != 1 {
        return Err(Error::SchemaMismatch(format!(
            "text data source supports only a single column, and you have {} columns",
            schema.len()
        )));
    }

    let field = &schema.fields()[0];
    if field.data_type() != &DataType::String {
        return Err(Error::SchemaMismatch(format!(
            "text data source does not support {} data type (column '{}')",
            field.data_type(),
            field.name()
        )));
    }

    Ok(())
}

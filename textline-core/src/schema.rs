//! Schema definition for connector rows and partition columns

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Data type for column values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean type
    Boolean,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 64-bit floating point
    Float64,

    /// UTF-8 encoded string
    String,

    /// Binary data
    Binary,

    /// Date (32-bit representing days since UNIX epoch)
    Date32,

    /// Timestamp in microseconds since UNIX epoch
    Timestamp,

    /// List of values with a given type
    List(Box<DataType>),

    /// Struct with named fields
    Struct(Vec<Field>),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "Boolean"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::String => write!(f, "String"),
            DataType::Binary => write!(f, "Binary"),
            DataType::Date32 => write!(f, "Date32"),
            DataType::Timestamp => write!(f, "Timestamp"),
            DataType::List(item_type) => write!(f, "List({item_type})"),
            DataType::Struct(fields) => {
                write!(f, "Struct({{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.data_type)?;
                }
                write!(f, "}})")
            }
        }
    }
}

/// A field in a schema, with a name, data type, and nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Name of the field
    pub name: String,

    /// Data type of the field
    pub data_type: DataType,

    /// Whether the field can be null
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: &str, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            nullable,
        }
    }

    /// Get the name of this field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the data type of this field
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Check if this field is nullable
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}: {} (nullable)", self.name, self.data_type)
        } else {
            write!(f, "{}: {} (non-nullable)", self.name, self.data_type)
        }
    }
}

/// A schema describing a row's structure
///
/// Equality and hashing consider the ordered field list only; the name index
/// is derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Fields in this schema
    fields: Vec<Field>,

    /// Field indices by name for faster lookup
    #[serde(skip)]
    field_indices: HashMap<String, usize>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        let field_indices = index_fields(&fields);
        Self {
            fields,
            field_indices,
        }
    }

    /// Create a schema with no fields
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Get all fields in this schema
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by index
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Get a field by name
    pub fn field_by_name(&self, name: &str) -> Result<&Field> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Get the index of a field by name
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.field_indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidArgument(format!("Field not found: {name}")))
    }

    /// Get the number of fields in this schema
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if this schema is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize this schema to a binary format
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(Error::Serialization)
    }

    /// Deserialize a schema from a binary format
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut schema: Self = bincode::deserialize(data).map_err(Error::Serialization)?;
        schema.field_indices = index_fields(&schema.fields);
        Ok(schema)
    }
}

fn index_fields(fields: &[Field]) -> HashMap<String, usize> {
    let mut field_indices = HashMap::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        field_indices.insert(field.name.clone(), i);
    }
    field_indices
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema: {} fields", self.fields.len())?;
        for field in &self.fields {
            writeln!(f, "  {field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_schema() -> Schema {
        Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("region", DataType::String, true),
        ])
    }

    #[test]
    fn test_lookup_by_name() {
        let schema = partition_schema();
        assert_eq!(schema.index_of("region").unwrap(), 1);
        assert_eq!(schema.field_by_name("year").unwrap().data_type(), &DataType::Int32);
        assert!(matches!(schema.index_of("missing"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_serialize_restores_name_index() {
        let schema = partition_schema();
        let bytes = schema.serialize().unwrap();
        let restored = Schema::deserialize(&bytes).unwrap();

        assert_eq!(restored, schema);
        assert_eq!(restored.index_of("region").unwrap(), 1);
    }

    #[test]
    fn test_display_names_types() {
        let nested = DataType::Struct(vec![Field::new("a", DataType::List(Box::new(DataType::Int64)), true)]);
        assert_eq!(nested.to_string(), "Struct({a: List(Int64)})");
        assert!(partition_schema().to_string().starts_with("Schema: 2 fields"));
    }
}

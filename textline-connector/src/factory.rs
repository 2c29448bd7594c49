//! Registration of the text format with the host engine

use textline_core::{ConfigProvider, Result, Schema, TextConf};

use crate::relation::TextRelation;

/// A format the host engine can open relations with
pub trait RelationProvider: Send + Sync {
    /// The relation type this provider creates
    type Relation;

    /// Name the format is registered under
    fn short_name(&self) -> &'static str;

    /// Create a relation over the given paths
    fn create_relation(
        &self,
        paths: &[String],
        partition_schema: Option<Schema>,
        user_schema: Option<&Schema>,
    ) -> Result<Self::Relation>;
}

/// The line-oriented text format
#[derive(Debug, Clone, Default)]
pub struct TextFileFormat {
    conf: TextConf,
}

impl TextFileFormat {
    /// Create the format with explicit settings
    pub fn new(conf: TextConf) -> Self {
        Self { conf }
    }

    /// Create the format with settings read from the host's configuration
    pub fn from_provider(provider: &dyn ConfigProvider) -> Result<Self> {
        Ok(Self::new(TextConf::from_provider(provider)?))
    }

    /// Settings relations of this format are created with
    pub fn conf(&self) -> &TextConf {
        &self.conf
    }
}

impl RelationProvider for TextFileFormat {
    type Relation = TextRelation;

    fn short_name(&self) -> &'static str {
        "text"
    }

    fn create_relation(
        &self,
        paths: &[String],
        partition_schema: Option<Schema>,
        user_schema: Option<&Schema>,
    ) -> Result<TextRelation> {
        TextRelation::new(paths.iter().cloned(), partition_schema, user_schema, self.conf.clone())
    }
}

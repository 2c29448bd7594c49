//! Text relations: the connector's handle to a dataset

use std::hash::{Hash, Hasher};
use std::path::Path;

use textline_core::{FileStatus, FileSystem, JobContext, Result, Schema, TextConf};
use tracing::debug;

use crate::scan::TextScan;
use crate::schema::{text_schema, verify_schema};
use crate::writer::TextOutputWriterFactory;

/// A dataset of line-oriented text files
///
/// Identity is the set of input paths plus the partition-column schema. Two
/// relations over the same paths given in a different order, or with
/// duplicates, are equal and hash alike. Settings and the fixed data schema
/// do not take part in identity.
#[derive(Debug, Clone)]
pub struct TextRelation {
    /// Input paths, sorted and deduplicated
    paths: Vec<String>,

    /// Partition columns; `None` when there are none
    partition_schema: Option<Schema>,

    /// Always the single `text` string column
    data_schema: Schema,

    /// Connector settings
    conf: TextConf,
}

impl TextRelation {
    /// Create a relation, validating the caller's data schema if one is given
    pub fn new<I, S>(
        paths: I,
        partition_schema: Option<Schema>,
        user_schema: Option<&Schema>,
        conf: TextConf,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(schema) = user_schema {
            verify_schema(schema)?;
        }

        let paths = normalize_paths(paths);
        let partition_schema = partition_schema.filter(|schema| !schema.is_empty());
        debug!(
            paths = paths.len(),
            partition_columns = partition_schema.as_ref().map_or(0, Schema::len),
            "created text relation"
        );

        Ok(Self {
            paths,
            partition_schema,
            data_schema: text_schema(),
            conf,
        })
    }

    /// Input paths in lexicographic order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Partition-column schema, if any
    pub fn partition_schema(&self) -> Option<&Schema> {
        self.partition_schema.as_ref()
    }

    /// The data schema: one string column named `text`
    pub fn schema(&self) -> &Schema {
        &self.data_schema
    }

    /// Connector settings
    pub fn conf(&self) -> &TextConf {
        &self.conf
    }

    /// Files backing this relation, sorted by path without duplicates
    pub fn list_files(&self, fs: &dyn FileSystem) -> Result<Vec<FileStatus>> {
        let mut files = Vec::new();
        for path in &self.paths {
            files.extend(fs.list_files(Path::new(path))?);
        }

        files.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        files.dedup_by(|a, b| a.path == b.path);
        Ok(files)
    }

    /// Scan the files assigned to one partition
    pub fn scan<'fs>(&self, fs: &'fs dyn FileSystem, files: Vec<FileStatus>) -> TextScan<'fs> {
        TextScan::new(fs, self.data_schema.clone(), files, self.conf.initial_scratch_size())
    }

    /// Prepare a write job, returning the factory tasks create writers from
    pub fn prepare_write(&self, job: &JobContext) -> TextOutputWriterFactory {
        debug!(job_id = %job.job_id(), "preparing text write");
        TextOutputWriterFactory::new(job.job_id(), self.conf.output_extension())
    }
}

fn normalize_paths<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();
    paths.sort_unstable();
    paths.dedup();
    paths
}

impl PartialEq for TextRelation {
    fn eq(&self, other: &Self) -> bool {
        self.paths == other.paths && self.partition_schema == other.partition_schema
    }
}

impl Eq for TextRelation {}

impl Hash for TextRelation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.paths.hash(state);
        self.partition_schema.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::fs;

    use textline_core::{DataType, Error, Field, LocalFileSystem, RowSource};

    fn hash_of(relation: &TextRelation) -> u64 {
        let mut hasher = DefaultHasher::new();
        relation.hash(&mut hasher);
        hasher.finish()
    }

    fn relation(paths: &[&str], partition_schema: Option<Schema>) -> TextRelation {
        TextRelation::new(paths.iter().copied(), partition_schema, None, TextConf::default()).unwrap()
    }

    fn year_partition() -> Schema {
        Schema::new(vec![Field::new("year", DataType::Int32, false)])
    }

    #[test]
    fn test_path_order_does_not_affect_identity() {
        let ab = relation(&["/data/a", "/data/b"], None);
        let ba = relation(&["/data/b", "/data/a"], None);

        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));
    }

    #[test]
    fn test_duplicate_paths_collapse() {
        assert_eq!(relation(&["/x", "/x", "/y"], None), relation(&["/y", "/x"], None));
    }

    #[test]
    fn test_partition_schema_affects_identity() {
        let plain = relation(&["/data/a"], None);
        let partitioned = relation(&["/data/a"], Some(year_partition()));
        let other = relation(
            &["/data/a"],
            Some(Schema::new(vec![Field::new("month", DataType::Int32, false)])),
        );

        assert_ne!(plain, partitioned);
        assert_ne!(partitioned, other);
        assert_eq!(partitioned, relation(&["/data/a"], Some(year_partition())));
    }

    #[test]
    fn test_empty_partition_schema_means_none() {
        assert_eq!(relation(&["/a"], Some(Schema::empty())), relation(&["/a"], None));
    }

    #[test]
    fn test_settings_do_not_affect_identity() {
        let a = relation(&["/a"], None);
        let b = TextRelation::new(["/a"], None, None, TextConf::default().with_output_extension(".txt")).unwrap();

        assert_eq!(a, b);
        let cache: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bad_user_schema_prevents_construction() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::String, false),
            Field::new("b", DataType::String, false),
        ]);
        let result = TextRelation::new(["/a"], None, Some(&schema), TextConf::default());

        assert!(matches!(result, Err(Error::SchemaMismatch(_))));
    }

    #[test]
    fn test_data_schema_is_fixed() {
        let schema = Schema::new(vec![Field::new("value", DataType::String, true)]);
        let relation = TextRelation::new(["/a"], None, Some(&schema), TextConf::default()).unwrap();

        assert_eq!(relation.schema(), &text_schema());
    }

    #[test]
    fn test_list_files_across_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("b.txt"), "b\n").unwrap();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let nested_path = nested.to_string_lossy().into_owned();
        let relation = relation(&[nested_path.as_str(), root.as_str()], None);

        let fs = LocalFileSystem::new();
        let files = relation.list_files(&fs).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned()).collect();

        // nested/b.txt is reachable from both inputs but listed once
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        let mut scan = relation.scan(&fs, files);
        assert_eq!(scan.next_row().unwrap().unwrap().bytes(), b"a");
        assert_eq!(scan.next_row().unwrap().unwrap().bytes(), b"b");
        assert!(scan.next_row().unwrap().is_none());
    }
}

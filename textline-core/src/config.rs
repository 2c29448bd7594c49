//! Named settings supplied by the host engine

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Key for the buffered reader capacity
pub const READ_BUFFER_SIZE_KEY: &str = "textline.io.readBufferSize";

/// Key for the buffered writer capacity
pub const WRITE_BUFFER_SIZE_KEY: &str = "textline.io.writeBufferSize";

/// Key for the suffix appended to output file names
pub const OUTPUT_EXTENSION_KEY: &str = "textline.output.extension";

/// Key for the scratch buffer capacity a scan starts with
pub const INITIAL_SCRATCH_SIZE_KEY: &str = "textline.scan.initialScratchSize";

/// Largest scratch buffer a scan may allocate up front
pub const MAX_INITIAL_SCRATCH_SIZE: usize = 64 << 20;

/// Source of named string settings
///
/// Implementors only provide raw lookup; typed accessors parse on read and
/// fall back to the given default when the key is absent.
pub trait ConfigProvider: Send + Sync {
    /// Raw value for a key, if set
    fn get(&self, name: &str) -> Option<String>;

    /// String value or default
    fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    /// Integer value or default
    fn get_int(&self, name: &str, default: i64) -> Result<i64> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{name}: expected an integer, got '{value}'"))),
            None => Ok(default),
        }
    }

    /// Boolean value or default
    fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::Config(format!("{name}: expected true or false, got '{value}'"))),
            },
            None => Ok(default),
        }
    }

    /// Byte size value (e.g. `512`, `64k`, `2m`) or default
    fn get_bytes(&self, name: &str, default: &str) -> Result<u64> {
        let value = self.get_or(name, default);
        parse_byte_string(&value).map_err(|e| Error::Config(format!("{name}: {e}")))
    }
}

/// Parse a byte size such as `100`, `64k`, `64kb`, `2m` or `1g`
///
/// Units are binary (k = 1024). A bare number is a count of bytes.
pub fn parse_byte_string(value: &str) -> std::result::Result<u64, String> {
    let lower = value.trim().to_ascii_lowercase();
    let split = lower
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lower.len());
    let (digits, unit) = lower.split_at(split);

    if digits.is_empty() {
        return Err(format!("invalid byte string '{value}'"));
    }

    let number: u64 = digits
        .parse()
        .map_err(|_| format!("invalid byte string '{value}'"))?;

    let multiplier: u64 = match unit.trim() {
        "" | "b" => 1,
        "k" | "kb" => 1 << 10,
        "m" | "mb" => 1 << 20,
        "g" | "gb" => 1 << 30,
        "t" | "tb" => 1 << 40,
        other => return Err(format!("unknown byte unit '{other}' in '{value}'")),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("byte string '{value}' overflows"))
}

/// In-memory settings map
#[derive(Debug, Clone, Default)]
pub struct MapConfigProvider {
    values: HashMap<String, String>,
}

impl MapConfigProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object whose values are strings
    pub fn from_json(json: &str) -> Result<Self> {
        let values: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { values })
    }

    /// Set a value, returning the provider for chaining
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value
    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

impl ConfigProvider for MapConfigProvider {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl From<HashMap<String, String>> for MapConfigProvider {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

/// Typed view of the connector's settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextConf {
    read_buffer_size: usize,
    write_buffer_size: usize,
    output_extension: String,
    initial_scratch_size: usize,
}

impl TextConf {
    /// Read all connector settings from a provider
    pub fn from_provider(conf: &dyn ConfigProvider) -> Result<Self> {
        Ok(Self {
            read_buffer_size: to_usize(READ_BUFFER_SIZE_KEY, conf.get_bytes(READ_BUFFER_SIZE_KEY, "64k")?)?,
            write_buffer_size: to_usize(WRITE_BUFFER_SIZE_KEY, conf.get_bytes(WRITE_BUFFER_SIZE_KEY, "64k")?)?,
            output_extension: conf.get_or(OUTPUT_EXTENSION_KEY, ""),
            initial_scratch_size: initial_scratch_size(conf.get_bytes(INITIAL_SCRATCH_SIZE_KEY, "0")?)?,
        })
    }

    /// Buffered reader capacity in bytes
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Buffered writer capacity in bytes
    pub fn write_buffer_size(&self) -> usize {
        self.write_buffer_size
    }

    /// Suffix appended to output file names
    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    /// Scratch buffer capacity a scan starts with
    pub fn initial_scratch_size(&self) -> usize {
        self.initial_scratch_size
    }

    /// Replace the output extension
    pub fn with_output_extension(mut self, extension: &str) -> Self {
        self.output_extension = extension.to_string();
        self
    }
}

impl Default for TextConf {
    fn default() -> Self {
        Self {
            read_buffer_size: 64 * 1024,
            write_buffer_size: 64 * 1024,
            output_extension: String::new(),
            initial_scratch_size: 0,
        }
    }
}

fn initial_scratch_size(value: u64) -> Result<usize> {
    let size = to_usize(INITIAL_SCRATCH_SIZE_KEY, value)?;
    if size > MAX_INITIAL_SCRATCH_SIZE {
        return Err(Error::Config(format!(
            "{INITIAL_SCRATCH_SIZE_KEY}: {size} exceeds the limit of {MAX_INITIAL_SCRATCH_SIZE} bytes"
        )));
    }
    Ok(size)
}

fn to_usize(name: &str, value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::Config(format!("{name}: {value} does not fit in memory")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("100", 100 ; "bare bytes")]
    #[test_case("64k", 64 * 1024 ; "kibibytes")]
    #[test_case("64KB", 64 * 1024 ; "upper case unit")]
    #[test_case("2m", 2 * 1024 * 1024 ; "mebibytes")]
    #[test_case(" 1g ", 1 << 30 ; "padded gibibytes")]
    fn test_parse_byte_string(input: &str, expected: u64) {
        assert_eq!(parse_byte_string(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("k" ; "unit only")]
    #[test_case("12q" ; "unknown unit")]
    #[test_case("-5" ; "negative")]
    fn test_parse_byte_string_rejects(input: &str) {
        assert!(parse_byte_string(input).is_err());
    }

    #[test]
    fn test_defaults_when_unset() {
        let conf = TextConf::from_provider(&MapConfigProvider::new()).unwrap();
        assert_eq!(conf, TextConf::default());
        assert_eq!(conf.output_extension(), "");
    }

    #[test]
    fn test_reads_from_json() {
        let provider = MapConfigProvider::from_json(
            r#"{"textline.io.readBufferSize": "1m", "textline.output.extension": ".txt"}"#,
        )
        .unwrap();
        let conf = TextConf::from_provider(&provider).unwrap();

        assert_eq!(conf.read_buffer_size(), 1 << 20);
        assert_eq!(conf.write_buffer_size(), 64 * 1024);
        assert_eq!(conf.output_extension(), ".txt");
    }

    #[test]
    fn test_bad_value_names_key() {
        let provider = MapConfigProvider::new().with(WRITE_BUFFER_SIZE_KEY, "lots");
        let err = TextConf::from_provider(&provider).unwrap_err();
        assert!(err.to_string().contains(WRITE_BUFFER_SIZE_KEY));
    }

    #[test_case("64m", Some(64 << 20) ; "at limit")]
    #[test_case("4k", Some(4096) ; "small")]
    #[test_case("65m", None ; "over limit")]
    #[test_case("1t", None ; "terabyte")]
    fn test_initial_scratch_size_is_capped(value: &str, expected: Option<usize>) {
        let provider = MapConfigProvider::new().with(INITIAL_SCRATCH_SIZE_KEY, value);
        match (TextConf::from_provider(&provider), expected) {
            (Ok(conf), Some(size)) => assert_eq!(conf.initial_scratch_size(), size),
            (Err(Error::Config(msg)), None) => assert!(msg.contains(INITIAL_SCRATCH_SIZE_KEY)),
            (other, _) => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let provider = MapConfigProvider::new()
            .with("retries", "3")
            .with("lazy", "TRUE")
            .with("broken", "maybe");

        assert_eq!(provider.get_int("retries", 0).unwrap(), 3);
        assert_eq!(provider.get_int("missing", 7).unwrap(), 7);
        assert!(provider.get_bool("lazy", false).unwrap());
        assert!(matches!(provider.get_bool("broken", false), Err(Error::Config(_))));
    }
}

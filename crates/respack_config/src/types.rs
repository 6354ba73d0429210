//! Configuration types deserialized from `compile.config`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default output directory name, relative to the package directory.
pub const DEFAULT_OUTPUT_DIR: &str = "__output__";

/// Default intermediate directory name, relative to the package directory.
pub const DEFAULT_INTERMEDIATE_DIR: &str = "__interm__";

/// The build configuration parsed from `compile.config`.
///
/// Every field is optional in the file; absent fields take the defaults
/// documented on each field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileConfig {
    /// Output directory for the finished package (default `__output__`).
    #[serde(default = "default_output")]
    pub output: String,
    /// Directory holding cached conversion artifacts (default `__interm__`).
    #[serde(default = "default_intermediate")]
    pub intermediate: String,
    /// Replace readable output file names with sequence numbers.
    #[serde(default)]
    pub obfuscate: bool,
    /// Directories that are never searched for resource declarations.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub ignore: Vec<String>,
    /// Clear an existing output directory without asking.
    #[serde(default)]
    pub force_overwrite_output: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            intermediate: default_intermediate(),
            obfuscate: false,
            ignore: Vec::new(),
            force_overwrite_output: false,
        }
    }
}

fn default_output() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_intermediate() -> String {
    DEFAULT_INTERMEDIATE_DIR.to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

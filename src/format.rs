//! Config file formats and their codecs.
//!
//! Four file naming conventions map onto three codecs:
//! - `.env` and `.env.<env>.sh` files use the line codec (`KEY=VALUE`)
//! - `config.<env>.json` uses the object codec
//! - `config.<env>.yaml` uses the mapping codec
//!
//! Every codec works on a flat string map. Nested values are rejected.

use crate::error::{ConfigError, Result};
use regex_lite::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;

/// Flat key to value mapping produced and consumed by the codecs.
pub type ConfigMap = HashMap<String, String>;

/// Label used in decode errors when bytes did not come from a file.
const RAW_INPUT: &str = "<input>";

/// Lines of the form `KEY = VALUE`. Anything else in an env file is ignored.
static ENV_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([_a-zA-Z0-9]+)[ \t]*=(.*)$").expect("env line pattern is valid")
});

/// Config file format, derived from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// `.env`, the dev default, keeps editor syntax highlighting
    Env,
    /// `.env.<env>.sh` for other environments and samples
    Sh,
    Json,
    Yaml,
}

impl FileFormat {
    /// Order in which formats are tried when loading.
    pub const fn load_precedence() -> [FileFormat; 4] {
        [
            FileFormat::Env,
            FileFormat::Sh,
            FileFormat::Json,
            FileFormat::Yaml,
        ]
    }

    /// File extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Env => "env",
            FileFormat::Sh => "sh",
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
        }
    }

    /// Whether files of this format use the `KEY=VALUE` line syntax.
    pub fn is_line_format(&self) -> bool {
        matches!(self, FileFormat::Env | FileFormat::Sh)
    }

    /// Derive the format from a file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ConfigError::UnknownFormat(path.display().to_string()))?;

        if name == ".env" || name.ends_with(".env") {
            Ok(FileFormat::Env)
        } else if name.ends_with(".sh") {
            Ok(FileFormat::Sh)
        } else if name.ends_with(".json") {
            Ok(FileFormat::Json)
        } else if name.ends_with(".yaml") || name.ends_with(".yml") {
            Ok(FileFormat::Yaml)
        } else {
            Err(ConfigError::UnknownFormat(name.to_string()))
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for FileFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "env" => Ok(FileFormat::Env),
            "sh" => Ok(FileFormat::Sh),
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Decode raw bytes into a flat map.
pub fn decode(bytes: &[u8], format: FileFormat) -> Result<ConfigMap> {
    decode_from(RAW_INPUT, bytes, format)
}

/// Decode bytes read from `path`, so errors can name the file.
pub fn decode_file(path: &Path, bytes: &[u8]) -> Result<ConfigMap> {
    let format = FileFormat::from_path(path)?;
    decode_from(&path.display().to_string(), bytes, format)
}

fn decode_from(origin: &str, bytes: &[u8], format: FileFormat) -> Result<ConfigMap> {
    match format {
        FileFormat::Env | FileFormat::Sh => {
            // Invalid bytes only matter on assignment lines, where they become U+FFFD
            let text = String::from_utf8_lossy(bytes);
            decode_env(origin, &text)
        }
        FileFormat::Json => {
            serde_json::from_slice::<ConfigMap>(bytes).map_err(|e| ConfigError::decode(origin, e))
        }
        FileFormat::Yaml => decode_yaml(origin, bytes),
    }
}

/// Encode a flat map, keys sorted ascending.
pub fn encode(map: &ConfigMap, format: FileFormat) -> Result<Vec<u8>> {
    let sorted: BTreeMap<&str, &str> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

    match format {
        FileFormat::Env | FileFormat::Sh => Ok(encode_env(&sorted).into_bytes()),
        FileFormat::Json => {
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            sorted.serialize(&mut ser).map_err(|e| ConfigError::Encode {
                format: format.to_string(),
                reason: e.to_string(),
            })?;
            Ok(buf)
        }
        FileFormat::Yaml => serde_yaml::to_string(&sorted)
            .map(String::into_bytes)
            .map_err(|e| ConfigError::Encode {
                format: format.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Parse `KEY=VALUE` lines.
///
/// Lines that do not look like an assignment (comments, shebangs, shell
/// commands) are skipped. A value wrapped in double quotes loses the outer
/// pair only; quotes inside the value are kept. Quotes are not written back
/// by [`encode`].
fn decode_env(origin: &str, text: &str) -> Result<ConfigMap> {
    let mut map = ConfigMap::new();

    for line in ENV_LINE.find_iter(text) {
        let Some((key, value)) = line.as_str().split_once('=') else {
            return Err(ConfigError::decode(
                origin,
                format!("line matched but has no '=': {}", line.as_str()),
            ));
        };

        let key = key.trim();
        let value = value.trim();
        let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            &value[1..value.len() - 1]
        } else {
            value
        };

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

fn encode_env(sorted: &BTreeMap<&str, &str>) -> String {
    let mut out = String::new();
    for (key, value) in sorted {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// YAML scalars are read as their string form; null becomes "".
fn decode_yaml(origin: &str, bytes: &[u8]) -> Result<ConfigMap> {
    use serde_yaml::Value;

    let raw: BTreeMap<String, Value> =
        serde_yaml::from_slice(bytes).map_err(|e| ConfigError::decode(origin, e))?;

    let mut map = ConfigMap::with_capacity(raw.len());
    for (key, value) in raw {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
                return Err(ConfigError::decode(
                    origin,
                    format!("value for key {} must be a scalar", key),
                ));
            }
        };
        map.insert(key, value);
    }

    Ok(map)
}

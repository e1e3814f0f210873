//! Structured error types for config resolution.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving, decoding or composing configuration.
///
/// None of these are recovered internally: every variant aborts the
/// resolution that produced it and carries enough context (path, key,
/// environment) to diagnose the failure without re-running.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application root directory does not exist.
    #[error("app dir does not exist: {}", path.display())]
    AppDirNotFound { path: PathBuf },

    /// No candidate file existed for the environment.
    #[error("config file not found for env '{env}' in {}", dir.display())]
    ConfigFileNotFound { env: String, dir: PathBuf },

    /// The selected file contains nothing but whitespace.
    #[error("config file is empty: {}", path.display())]
    EmptyConfigFile { path: PathBuf },

    /// A codec failed on bytes read from a known location.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// A codec failed to serialize a map.
    #[error("failed to encode config as {format}: {reason}")]
    Encode { format: String, reason: String },

    /// Composition found a key that was already present.
    #[error("duplicate key {key}")]
    DuplicateKey { key: String },

    /// Merge walked every ancestor of the directory without finding config.
    #[error("parent config not found for {}", dir.display())]
    ParentConfigNotFound { dir: PathBuf },

    /// Extend and merge were requested together.
    #[error("not implemented: extend and merge can not be combined")]
    UnsupportedComposition,

    /// A key that was referenced is not in the config.
    #[error("missing key {key}")]
    MissingKey { key: String },

    /// Wildcards are only valid for enumeration.
    #[error("wildcard env '{env}' can not be loaded directly")]
    WildcardEnvironment { env: String },

    /// An updated key does not carry the configured prefix.
    #[error("key {key} must start with prefix {prefix}")]
    KeyPrefixMismatch { key: String, prefix: String },

    /// An updated key was given without a value.
    #[error("missing value for key {key}")]
    MissingValue { key: String },

    /// A format tag or file name did not map to a known format.
    #[error("unknown config format '{0}'")]
    UnknownFormat(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

impl ConfigError {
    pub fn decode(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn missing_key(key: &str) -> Self {
        Self::MissingKey {
            key: key.to_string(),
        }
    }

    pub fn duplicate_key(key: &str) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }

    /// True for the "nothing there" case that ancestor search skips over.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ConfigFileNotFound { .. })
    }
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

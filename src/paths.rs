//! Config file naming.
//!
//! Maps an (app dir, env, format) triple onto the file name that holds it.
//! The naming rules are shared with existing deployments and must not change:
//!
//! | format | default (`""`) | env `prod`      | env `sample.prod`      |
//! |--------|----------------|-----------------|------------------------|
//! | env    | `.env`         | `prod.env`      | `sample.prod.env`      |
//! | sh     | `.env.sh`      | `.env.prod.sh`  | `sample.env.prod.sh`   |
//! | json   | `config.json`  | `config.prod.json` | `sample.config.prod.json` |
//! | yaml   | `config.yaml`  | `config.prod.yaml` | `sample.config.prod.yaml` |
//!
//! Only the app dir is checked for existence here; whether the file exists
//! is decided by the loader.

use crate::error::{ConfigError, Result};
use crate::format::FileFormat;
use std::path::{Path, PathBuf};

/// Environment used when none is given; also the only env with fallbacks.
pub const ENV_DEV: &str = "dev";

/// Name segment marking a sample file.
pub const SAMPLE: &str = "sample";

/// Env prefix selecting the sample variant, e.g. `sample.dev`.
pub const SAMPLE_PREFIX: &str = "sample.";

/// An environment name split into its sample marker and literal part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvName {
    pub name: String,
    pub sample: bool,
}

impl EnvName {
    /// Strip the first `sample.` marker, if any.
    pub fn parse(env: &str) -> Self {
        let env = env.trim();
        if env.contains(SAMPLE_PREFIX) {
            Self {
                name: env.replacen(SAMPLE_PREFIX, "", 1),
                sample: true,
            }
        } else {
            Self {
                name: env.to_string(),
                sample: false,
            }
        }
    }

    /// File name for this env in the given format.
    pub fn file_name(&self, format: FileFormat) -> String {
        let env = self.name.as_str();
        match format {
            FileFormat::Env if env.is_empty() && !self.sample => ".env".to_string(),
            FileFormat::Env => {
                let mut parts = Vec::with_capacity(3);
                if self.sample {
                    parts.push(SAMPLE);
                }
                if !env.is_empty() {
                    parts.push(env);
                }
                parts.push(format.extension());
                parts.join(".")
            }
            FileFormat::Sh => {
                let sample = if self.sample { SAMPLE } else { "" };
                format!("{}.env{}.{}", sample, env_segment(env), format.extension())
            }
            FileFormat::Json | FileFormat::Yaml => {
                let sample = if self.sample { SAMPLE_PREFIX } else { "" };
                format!("{}config{}.{}", sample, env_segment(env), format.extension())
            }
        }
    }
}

fn env_segment(env: &str) -> String {
    if env.is_empty() {
        String::new()
    } else {
        format!(".{}", env)
    }
}

/// Fail with [`ConfigError::AppDirNotFound`] unless `app_dir` exists.
pub fn ensure_app_dir(app_dir: &Path) -> Result<()> {
    match std::fs::metadata(app_dir) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::AppDirNotFound {
            path: app_dir.to_path_buf(),
        }),
        Err(e) => Err(ConfigError::io(app_dir, e)),
    }
}

/// Path of the config file for `env` in `format`.
///
/// Sample files are addressed by prefixing the env, e.g. `sample.dev`
/// resolves to `sample.config.dev.json` for JSON.
pub fn config_file_path(app_dir: &Path, env: &str, format: FileFormat) -> Result<PathBuf> {
    ensure_app_dir(app_dir)?;
    Ok(app_dir.join(EnvName::parse(env).file_name(format)))
}

/// Every path the config for `env` might be loaded from, in precedence order.
///
/// The bare `.env` file only stands in for the dev env. For dev, each format
/// also accepts its env-less file, so `config.json` is a valid dev config.
pub fn candidate_paths(app_dir: &Path, env: &str) -> Result<Vec<PathBuf>> {
    ensure_app_dir(app_dir)?;

    let mut paths = Vec::new();
    for format in FileFormat::load_precedence() {
        if format != FileFormat::Env {
            paths.push(config_file_path(app_dir, env, format)?);
        }
        if env.trim() == ENV_DEV {
            paths.push(config_file_path(app_dir, "", format)?);
        }
    }

    Ok(paths)
}

//! Discovery of the environments present in an app dir.

use crate::error::Result;
use crate::format::FileFormat;
use crate::paths::{SAMPLE_PREFIX, ensure_app_dir};
use regex_lite::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Env that expands to every non-sample environment.
pub const WILDCARD: &str = "*";

/// Env that expands to every sample environment.
pub const SAMPLE_WILDCARD: &str = "sample.*";

static CONFIG_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(sample\.)?config\.(\w[\w-]*)\.(json|yaml)$")
        .expect("config file name pattern is valid")
});

/// Whether `env` is a wildcard rather than a literal environment.
pub fn is_wildcard(env: &str) -> bool {
    let env = env.trim();
    env == WILDCARD || env == SAMPLE_WILDCARD
}

/// List the environments that have a structured config file in `app_dir`.
///
/// With `only_samples` the sample files are listed instead, each name
/// carrying the `sample.` marker. The result is sorted and de-duplicated.
pub fn enumerate_environments(app_dir: &Path, only_samples: bool) -> Result<Vec<String>> {
    ensure_app_dir(app_dir)?;

    let escaped_dir = glob::Pattern::escape(&app_dir.to_string_lossy());
    let prefix = if only_samples { SAMPLE_PREFIX } else { "" };

    let mut envs = BTreeSet::new();
    for format in [FileFormat::Json, FileFormat::Yaml] {
        let pattern = format!(
            "{}/{}config.*.{}",
            escaped_dir,
            prefix,
            format.extension()
        );

        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable glob entry");
                    continue;
                }
            };

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(caps) = CONFIG_FILE_NAME.captures(name) else {
                debug!(file = %name, "Ignoring file that does not name an env");
                continue;
            };

            let sample = caps.get(1).is_some();
            if sample != only_samples {
                continue;
            }
            envs.insert(format!("{}{}", prefix, &caps[2]));
        }
    }

    Ok(envs.into_iter().collect())
}

/// Expand an env selector into the environments it stands for.
///
/// `all` selects every environment and every sample. `*` and `sample.*`
/// enumerate the app dir; any other env is returned as is.
pub fn expand_environments(app_dir: &Path, env: &str, all: bool) -> Result<Vec<String>> {
    if all {
        let mut envs = enumerate_environments(app_dir, false)?;
        envs.extend(enumerate_environments(app_dir, true)?);
        return Ok(envs);
    }

    match env.trim() {
        WILDCARD => enumerate_environments(app_dir, false),
        SAMPLE_WILDCARD => enumerate_environments(app_dir, true),
        literal => Ok(vec![literal.to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "{}").unwrap();
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in [
            "config.dev.json",
            "config.prod.json",
            "sample.config.dev.json",
        ] {
            touch(temp.path(), name);
        }
        temp
    }

    #[test]
    fn test_enumerate_envs_and_samples() {
        let temp = fixture();
        assert_eq!(
            enumerate_environments(temp.path(), false).unwrap(),
            ["dev", "prod"]
        );
        assert_eq!(
            enumerate_environments(temp.path(), true).unwrap(),
            ["sample.dev"]
        );
    }

    #[test]
    fn test_enumerate_dedups_across_formats_and_ignores_noise() {
        let temp = fixture();
        touch(temp.path(), "config.prod.yaml");
        touch(temp.path(), "config.stage-ec2.yaml");
        touch(temp.path(), "config.json");
        touch(temp.path(), "config.a.b.json");
        touch(temp.path(), "config.-bad.json");
        touch(temp.path(), "notes.txt");

        assert_eq!(
            enumerate_environments(temp.path(), false).unwrap(),
            ["dev", "prod", "stage-ec2"]
        );
    }

    #[test]
    fn test_enumerate_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = enumerate_environments(&temp.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::AppDirNotFound { .. }));
    }

    #[test]
    fn test_expand() {
        let temp = fixture();
        let dir = temp.path();
        assert_eq!(expand_environments(dir, "*", false).unwrap(), ["dev", "prod"]);
        assert_eq!(
            expand_environments(dir, "sample.*", false).unwrap(),
            ["sample.dev"]
        );
        assert_eq!(
            expand_environments(dir, "dev", true).unwrap(),
            ["dev", "prod", "sample.dev"]
        );
        assert_eq!(expand_environments(dir, "qa", false).unwrap(), ["qa"]);
        assert!(is_wildcard(" * "));
        assert!(!is_wildcard("dev"));
    }
}

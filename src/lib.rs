//! Environment-addressed application config.
//!
//! Resolves flat key/value config files (`.env`, `.env.<env>.sh`,
//! `config.<env>.json`, `config.<env>.yaml`) from an app dir, and composes
//! config across extension and parent directories.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;

pub use config::{
    Composer, CompositionParams, ConfigLoader, ConfigStore, KeyConventions, Resolution,
    StoreCache, enumerate_environments,
};
pub use error::{ConfigError, Result};
pub use format::{ConfigMap, FileFormat, decode, encode};

use std::path::Path;

/// Resolve the config for `env` in `app_dir` with the default key prefix.
///
/// ```no_run
/// use appconf::{CompositionParams, resolve};
///
/// let resolution = resolve("/srv/app".as_ref(), "prod", &CompositionParams::single())?;
/// for key in resolution.store.keys() {
///     println!("{}", key);
/// }
/// # Ok::<(), appconf::ConfigError>(())
/// ```
pub fn resolve(app_dir: &Path, env: &str, params: &CompositionParams) -> Result<Resolution> {
    Composer::default().resolve(app_dir, env, params)
}

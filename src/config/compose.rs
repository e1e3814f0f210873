//! Composition of config from several directories.
//!
//! Three policies exist, exactly one is active per resolution:
//! - **Single**: the app dir's own config
//! - **Extend**: the app dir's config plus the config of each extension
//!   sub-directory
//! - **Merge**: the nearest ancestor directory's config plus the app dir's
//!
//! Composed sources must have disjoint keys. There is no override, a key
//! defined twice fails the whole resolution.

use super::conventions::{Convention, KeyConventions};
use super::enumerate::expand_environments;
use super::loader::{ConfigLoader, LoadedConfig};
use super::store::ConfigStore;
use crate::error::{ConfigError, Result};
use crate::paths::ensure_app_dir;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Caller supplied composition options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionParams {
    /// Extension sub-directories, relative to the app dir
    pub extend: Vec<String>,
    /// Compose with the nearest ancestor's config
    pub merge: bool,
}

impl CompositionParams {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn extend<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extend: dirs.into_iter().map(Into::into).collect(),
            merge: false,
        }
    }

    pub fn merge() -> Self {
        Self {
            extend: Vec::new(),
            merge: true,
        }
    }

    /// The one policy these options select.
    pub fn policy(&self) -> Result<Policy> {
        match (self.extend.is_empty(), self.merge) {
            (true, false) => Ok(Policy::Single),
            (false, false) => Ok(Policy::Extend(self.extend.clone())),
            (true, true) => Ok(Policy::Merge),
            (false, true) => Err(ConfigError::UnsupportedComposition),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    Single,
    Extend(Vec<String>),
    Merge,
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Files the store was built from; the app dir's own file comes first,
    /// except for merge where the parent's file leads.
    pub paths: Vec<PathBuf>,
    pub store: ConfigStore,
}

impl Resolution {
    fn single(loaded: LoadedConfig) -> Self {
        Self {
            paths: vec![loaded.path],
            store: loaded.store,
        }
    }

    /// Merge another loaded source into this one.
    fn absorb(&mut self, loaded: LoadedConfig) -> Result<()> {
        self.store.merge_disjoint(&loaded.store)?;
        self.paths.push(loaded.path);
        Ok(())
    }
}

/// Resolves composed configuration.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    loader: ConfigLoader,
    conventions: KeyConventions,
}

impl Composer {
    pub fn new(conventions: KeyConventions) -> Self {
        Self {
            loader: ConfigLoader::new(),
            conventions,
        }
    }

    pub fn with_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn conventions(&self) -> &KeyConventions {
        &self.conventions
    }

    pub fn loader_mut(&mut self) -> &mut ConfigLoader {
        &mut self.loader
    }

    /// Resolve the config for one environment.
    pub fn resolve(
        &mut self,
        app_dir: &Path,
        env: &str,
        params: &CompositionParams,
    ) -> Result<Resolution> {
        match params.policy()? {
            Policy::Single => {
                let loaded = self.loader.load(app_dir, env)?;
                match self.declared_extensions(app_dir, &loaded.store)? {
                    Some(dirs) => {
                        info!(
                            env = %env,
                            count = dirs.len(),
                            "Applying extensions declared in config"
                        );
                        self.extend(loaded, &dirs, env)
                    }
                    None => Ok(Resolution::single(loaded)),
                }
            }
            Policy::Extend(names) => {
                let loaded = self.loader.load(app_dir, env)?;
                let dirs: Vec<PathBuf> = names.iter().map(|n| app_dir.join(n)).collect();
                self.extend(loaded, &dirs, env)
            }
            Policy::Merge => self.merge(app_dir, env),
        }
    }

    /// Expand `env` (wildcards, or every env with `all`) and resolve each.
    pub fn resolve_all(
        &mut self,
        app_dir: &Path,
        env: &str,
        all: bool,
        params: &CompositionParams,
    ) -> Result<Vec<(String, Resolution)>> {
        let envs = expand_environments(app_dir, env, all)?;
        let mut resolved = Vec::with_capacity(envs.len());
        for env in envs {
            let resolution = self.resolve(app_dir, &env, params)?;
            resolved.push((env, resolution));
        }
        Ok(resolved)
    }

    fn extend(&mut self, main: LoadedConfig, dirs: &[PathBuf], env: &str) -> Result<Resolution> {
        let mut resolution = Resolution::single(main);
        for dir in dirs {
            debug!(dir = %dir.display(), env = %env, "Loading extension");
            let loaded = self.loader.load(dir, env)?;
            resolution.absorb(loaded)?;
        }
        Ok(resolution)
    }

    fn merge(&mut self, app_dir: &Path, env: &str) -> Result<Resolution> {
        ensure_app_dir(app_dir)?;
        let parent = self.find_parent(app_dir, env)?;
        info!(
            parent = %parent.path.display(),
            dir = %app_dir.display(),
            "Merging config into parent"
        );
        let own = self.loader.load(app_dir, env)?;

        let mut resolution = Resolution::single(parent);
        resolution.absorb(own)?;
        Ok(resolution)
    }

    /// Nearest ancestor of `app_dir` with config for `env`.
    ///
    /// Ancestors without a config file are skipped. Any other failure, such
    /// as a file that does not decode, stops the search. The walk starts from
    /// the canonical app dir so `..` components can't point it downwards.
    fn find_parent(&mut self, app_dir: &Path, env: &str) -> Result<LoadedConfig> {
        let start = std::fs::canonicalize(app_dir).map_err(|e| ConfigError::io(app_dir, e))?;

        let mut dir = start.parent();
        while let Some(candidate) = dir {
            if candidate.as_os_str().is_empty() {
                break;
            }
            match self.loader.load(candidate, env) {
                Ok(loaded) => return Ok(loaded),
                Err(e) if e.is_not_found() => {
                    debug!(dir = %candidate.display(), "No parent config here");
                }
                Err(e) => return Err(e),
            }
            dir = candidate.parent();
        }

        Err(ConfigError::ParentConfigNotFound {
            dir: app_dir.to_path_buf(),
        })
    }

    /// Extension dirs named by the reserved keys in `store`, if any.
    ///
    /// Both keys must be present once either is. Names are comma separated;
    /// blanks are ignored. A relative extensions dir is taken from `app_dir`.
    fn declared_extensions(
        &self,
        app_dir: &Path,
        store: &ConfigStore,
    ) -> Result<Option<Vec<PathBuf>>> {
        let list_key = self.conventions.key(Convention::Extensions);
        let dir_key = self.conventions.key(Convention::ExtensionsDir);

        let (list, dir) = match (store.get(list_key), store.get(dir_key)) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(ConfigError::missing_key(dir_key)),
            (None, Some(_)) => return Err(ConfigError::missing_key(list_key)),
            (Some(list), Some(dir)) => (list, dir),
        };

        let base = app_dir.join(dir.trim());
        let dirs: Vec<PathBuf> = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| base.join(name))
            .collect();

        if dirs.is_empty() {
            return Ok(None);
        }
        Ok(Some(dirs))
    }
}

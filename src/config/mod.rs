//! Config resolution and composition.
//!
//! A config is resolved from an app dir and an env name:
//! 1. **Paths** - candidate file names per format, see [`crate::paths`]
//! 2. **Loader** - first existing, non-empty candidate is decoded
//! 3. **Composition** - optionally combined with extension dirs or the
//!    nearest parent dir's config, keys must be disjoint
//!
//! ## Precedence
//! `.env` → `.env.<env>.sh` → `config.<env>.json` → `config.<env>.yaml`,
//! with env-less fallbacks for `dev`.
//!
//! ## Reserved keys
//! - `<PREFIX>EXTENSIONS` - comma separated extension dirs
//! - `<PREFIX>EXTENSIONS_DIR` - dir the extensions are in

mod compose;
mod conventions;
mod enumerate;
mod loader;
mod store;
mod update;

pub use compose::{Composer, CompositionParams, Policy, Resolution};
pub use conventions::{Convention, DEFAULT_PREFIX, KeyConventions};
pub use enumerate::{
    SAMPLE_WILDCARD, WILDCARD, enumerate_environments, expand_environments, is_wildcard,
};
pub use loader::{ConfigLoader, LoadedConfig, StoreCache};
pub use store::ConfigStore;
pub use update::update_store;

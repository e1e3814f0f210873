//! Reserved keys derived from the key prefix.

use std::collections::HashMap;

/// Default key prefix.
pub const DEFAULT_PREFIX: &str = "APP_";

/// Keys with a meaning to the tool itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `<PREFIX>DIR`, the app dir, normally set in the environment
    AppDir,
    /// `<PREFIX>EXTENSIONS`, comma separated extension dir names
    Extensions,
    /// `<PREFIX>EXTENSIONS_DIR`, the dir the extensions live in
    ExtensionsDir,
}

impl Convention {
    const ALL: [Convention; 3] = [
        Convention::AppDir,
        Convention::Extensions,
        Convention::ExtensionsDir,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            Convention::AppDir => "DIR",
            Convention::Extensions => "EXTENSIONS",
            Convention::ExtensionsDir => "EXTENSIONS_DIR",
        }
    }
}

/// Lookup table from convention to the concrete key for one prefix.
#[derive(Debug, Clone)]
pub struct KeyConventions {
    prefix: String,
    keys: HashMap<Convention, String>,
}

impl KeyConventions {
    /// Build the table. The prefix is normalized to end with `_`.
    pub fn new(prefix: &str) -> Self {
        let prefix = if prefix.ends_with('_') {
            prefix.to_string()
        } else {
            format!("{}_", prefix)
        };

        let keys = Convention::ALL
            .iter()
            .map(|c| (*c, format!("{}{}", prefix, c.suffix())))
            .collect();

        Self { prefix, keys }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, convention: Convention) -> &str {
        // Every variant is inserted by `new`
        self.keys
            .get(&convention)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for KeyConventions {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let c = KeyConventions::default();
        assert_eq!(c.prefix(), "APP_");
        assert_eq!(c.key(Convention::AppDir), "APP_DIR");
        assert_eq!(c.key(Convention::Extensions), "APP_EXTENSIONS");
        assert_eq!(c.key(Convention::ExtensionsDir), "APP_EXTENSIONS_DIR");
    }

    #[test]
    fn test_prefix_gets_underscore() {
        let c = KeyConventions::new("SVC");
        assert_eq!(c.prefix(), "SVC_");
        assert_eq!(c.key(Convention::Extensions), "SVC_EXTENSIONS");
    }
}

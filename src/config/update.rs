//! Key updates applied to a loaded store.

use super::conventions::KeyConventions;
use super::store::ConfigStore;
use crate::error::{ConfigError, Result};

/// Set `keys[i]` to `values[i]` for every key.
///
/// Keys are upper-cased first. All keys are validated before anything is
/// changed: each must carry the configured prefix and have a matching value.
pub fn update_store(
    store: &mut ConfigStore,
    keys: &[String],
    values: &[String],
    conventions: &KeyConventions,
) -> Result<()> {
    let prefix = conventions.prefix();
    let keys: Vec<String> = keys.iter().map(|k| k.trim().to_uppercase()).collect();
    for (i, key) in keys.iter().enumerate() {
        if !key.starts_with(prefix) {
            return Err(ConfigError::KeyPrefixMismatch {
                key: key.clone(),
                prefix: prefix.to_string(),
            });
        }
        if i >= values.len() {
            return Err(ConfigError::MissingValue { key: key.clone() });
        }
    }

    for (key, value) in keys.into_iter().zip(values) {
        store.insert(key, value.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_update_sets_and_adds_keys() {
        let mut store = ConfigStore::new();
        store.insert("APP_A", "old");

        update_store(
            &mut store,
            &strings(&["APP_A", "APP_B"]),
            &strings(&["new", "b"]),
            &KeyConventions::default(),
        )
        .unwrap();

        assert_eq!(store.get("APP_A"), Some("new"));
        assert_eq!(store.keys(), ["APP_A", "APP_B"]);
    }

    #[test]
    fn test_update_upper_cases_keys() {
        let mut store = ConfigStore::new();
        store.insert("APP_FOO", "old");

        update_store(
            &mut store,
            &strings(&["app_foo"]),
            &strings(&["new"]),
            &KeyConventions::default(),
        )
        .unwrap();

        assert_eq!(store.get("APP_FOO"), Some("new"));
        assert_eq!(store.keys(), ["APP_FOO"]);
    }

    #[test]
    fn test_update_rejects_foreign_prefix() {
        let mut store = ConfigStore::new();
        let err = update_store(
            &mut store,
            &strings(&["APP_A", "OTHER_B"]),
            &strings(&["a", "b"]),
            &KeyConventions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::KeyPrefixMismatch { ref key, .. } if key == "OTHER_B"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_requires_values() {
        let mut store = ConfigStore::new();
        let err = update_store(
            &mut store,
            &strings(&["APP_A", "APP_B"]),
            &strings(&["a"]),
            &KeyConventions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingValue { ref key } if key == "APP_B"));
    }
}

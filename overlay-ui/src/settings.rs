//! JSON-backed settings addressed by dotted key paths.
//!
//! `get("overlay.ui.font.size")` walks nested objects. Values that were never
//! set fall back to in-memory defaults, which are not written to disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::UiError;
use crate::primitives::Color;

/// A settings document with optional file backing.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    save_on_set: AtomicBool,
    data: Mutex<Value>,
    defaults: Mutex<IndexMap<String, Value>>,
}

/// `<config dir>/overlay/<name>.json`.
pub fn default_path(name: &str) -> Result<PathBuf> {
    let dir = dirs::config_dir().context("no configuration directory for this platform")?;
    Ok(dir.join("overlay").join(format!("{name}.json")))
}

impl SettingsStore {
    /// Load the store from `path`, creating an empty file if there is none.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let data = if path.exists() {
            info!(path = %path.display(), "loading settings");
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings: {:?}", path))?;
            let data: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse settings: {:?}", path))?;
            if !data.is_object() {
                return Err(UiError::Settings(format!(
                    "{} does not contain a JSON object",
                    path.display()
                ))
                .into());
            }
            data
        } else {
            warn!(path = %path.display(), "creating new settings file");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            let data = Value::Object(Map::new());
            std::fs::write(&path, data.to_string())
                .with_context(|| format!("Failed to write settings: {:?}", path))?;
            data
        };

        Ok(Self {
            path: Some(path),
            save_on_set: AtomicBool::new(true),
            data: Mutex::new(data),
            defaults: Mutex::new(IndexMap::new()),
        })
    }

    /// A store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            save_on_set: AtomicBool::new(false),
            data: Mutex::new(Value::Object(Map::new())),
            defaults: Mutex::new(IndexMap::new()),
        }
    }

    fn data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn defaults(&self) -> MutexGuard<'_, IndexMap<String, Value>> {
        self.defaults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether every `set` and `remove` writes the file.
    pub fn set_save_on_set(&self, save: bool) {
        self.save_on_set.store(save, Ordering::Relaxed);
    }

    /// Write the document to the backing file, if there is one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = {
            let data = self.data();
            serde_json::to_string_pretty(&*data)?
        };
        std::fs::write(path, text).with_context(|| format!("Failed to write settings: {:?}", path))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    fn autosave(&self) -> Result<()> {
        if self.save_on_set.load(Ordering::Relaxed) {
            self.save()
        } else {
            Ok(())
        }
    }

    /// Value returned for `key` while nothing is stored under it.
    pub fn set_default<T: Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.defaults().insert(key.to_string(), value);
        Ok(())
    }

    /// Store `value` under `key`, creating intermediate objects.
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        {
            let mut data = self.data();
            insert_path(&mut data, key, value)?;
        }
        self.autosave()
    }

    /// Store `value` in memory only, regardless of save-on-set. Returns
    /// whether the stored value changed; call [`SettingsStore::save`] later.
    pub fn stage<T: Serialize>(&self, key: &str, value: T) -> Result<bool> {
        let value = serde_json::to_value(value)?;
        let mut data = self.data();
        if lookup_path(&data, key) == Some(&value) {
            return Ok(false);
        }
        insert_path(&mut data, key, value)?;
        Ok(true)
    }

    /// Returns whether anything was stored under `key`.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = {
            let mut data = self.data();
            remove_path(&mut data, key)
        };
        if removed {
            self.autosave()?;
        }
        Ok(removed)
    }

    /// The stored value for `key`, else its default.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_with(key, |v| Some(v.clone()))
    }

    /// First of the stored value and the default that `convert` accepts.
    fn get_with<T>(&self, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let stored = {
            let data = self.data();
            lookup_path(&data, key).and_then(&convert)
        };
        stored.or_else(|| {
            self.defaults()
                .get(key)
                .and_then(&convert)
        })
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_with(key, Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get_with(key, Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_with(key, Value::as_bool)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_with(key, |v| v.as_str().map(str::to_string))
    }

    /// A packed 0xRRGGBBAA color.
    pub fn get_color(&self, key: &str) -> Option<Color> {
        self.get_with(key, |v| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Color)
        })
    }
}

fn lookup_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |value, part| value.get(part))
}

fn insert_path(root: &mut Value, key: &str, value: Value) -> Result<(), UiError> {
    let not_object = || UiError::Settings(format!("cannot set {key}: a parent is not an object"));

    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().unwrap_or(key);

    let mut current = root;
    for part in parts {
        current = current
            .as_object_mut()
            .ok_or_else(not_object)?
            .entry(part)
            .or_insert_with(|| Value::Object(Map::new()));
    }
    current
        .as_object_mut()
        .ok_or_else(not_object)?
        .insert(leaf.to_string(), value);
    Ok(())
}

fn remove_path(root: &mut Value, key: &str) -> bool {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (
            parent
                .split('.')
                .try_fold(root, |value, part| value.get_mut(part)),
            leaf,
        ),
        None => (Some(root), key),
    };
    parent
        .and_then(Value::as_object_mut)
        .is_some_and(|object| object.remove(leaf).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_paths_create_objects() {
        let store = SettingsStore::in_memory();
        store.set("overlay.ui.scale", 2).unwrap();
        store.set("overlay.ui.name", "main").unwrap();
        assert_eq!(store.get_i64("overlay.ui.scale"), Some(2));
        assert_eq!(store.get_string("overlay.ui.name").as_deref(), Some("main"));
        assert_eq!(
            store.get("overlay.ui"),
            Some(serde_json::json!({"scale": 2, "name": "main"}))
        );
    }

    #[test]
    fn defaults_apply_until_set() {
        let store = SettingsStore::in_memory();
        store.set_default("a.b", 7).unwrap();
        assert_eq!(store.get_i64("a.b"), Some(7));
        store.set("a.b", 9).unwrap();
        assert_eq!(store.get_i64("a.b"), Some(9));
        assert!(store.remove("a.b").unwrap());
        assert_eq!(store.get_i64("a.b"), Some(7));
        assert!(!store.remove("a.b").unwrap());
    }

    #[test]
    fn wrong_type_falls_back_to_default() {
        let store = SettingsStore::in_memory();
        store.set_default("flag", true).unwrap();
        store.set("flag", "yes").unwrap();
        assert_eq!(store.get_bool("flag"), Some(true));
        assert_eq!(store.get_f64("flag"), None);
    }

    #[test]
    fn set_through_a_scalar_fails() {
        let store = SettingsStore::in_memory();
        store.set("a", 1).unwrap();
        let err = store.set("a.b", 2).unwrap_err();
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn colors_are_packed_integers() {
        let store = SettingsStore::in_memory();
        store.set("c", 0x3D4478FFu32).unwrap();
        assert_eq!(store.get_color("c"), Some(Color(0x3D4478FF)));
        store.set("big", u64::MAX).unwrap();
        assert_eq!(store.get_color("big"), None);
    }

    #[test]
    fn staged_values_wait_for_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let store = SettingsStore::open(path.clone()).unwrap();
        assert!(store.stage("w.x", 5).unwrap());
        assert!(!store.stage("w.x", 5).unwrap());
        assert_eq!(store.get_i64("w.x"), Some(5));
        assert_eq!(SettingsStore::open(path.clone()).unwrap().get_i64("w.x"), None);

        store.save().unwrap();
        assert_eq!(SettingsStore::open(path).unwrap().get_i64("w.x"), Some(5));
    }
}

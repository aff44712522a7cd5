use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::warn;

use crate::models::post::Post;

use super::{prepend_encoded, Store};

pub const STORE_FILE: &str = "local_store.json";

/// File-backed implementation of the Store trait: one JSON object of
/// string values, the on-disk analogue of browser local storage.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: &str) -> Self {
        Self {
            path: Path::new(data_dir).join(STORE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // A panicked writer leaves no partial file behind, so the map on
        // disk is still usable
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Missing file or unparsable contents read as an empty map.
    fn read_map(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("Cannot read {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };
        if raw.trim().is_empty() {
            return BTreeMap::new();
        }
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("{} is corrupt, treating as empty: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    /// Write to a sibling temp file, then rename over the store file.
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
        }
        let body = serde_json::to_string_pretty(map).map_err(|e| e.to_string())?;
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}", STORE_FILE, uuid::Uuid::new_v4()));
        fs::write(&tmp, body).map_err(|e| format!("{}: {}", tmp.display(), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            format!("{}: {}", self.path.display(), e)
        })
    }
}

impl Store for JsonFileStore {
    fn run_migrations(&self) -> Result<(), String> {
        match self.path.parent() {
            Some(dir) => fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e)),
            None => Ok(()),
        }
    }

    fn item_get(&self, key: &str) -> Option<String> {
        let _guard = self.guard();
        self.read_map().remove(key)
    }

    fn item_set(&self, key: &str, value: &str) -> Result<(), String> {
        let _guard = self.guard();
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn item_remove(&self, key: &str) -> Result<(), String> {
        let _guard = self.guard();
        let mut map = self.read_map();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }

    fn post_prepend(&self, key: &str, post: &Post) -> Result<(), String> {
        let _guard = self.guard();
        let mut map = self.read_map();
        let next = prepend_encoded(key, map.get(key).map(String::as_str), post)?;
        map.insert(key.to_string(), next);
        self.write_map(&map)
    }

    fn db_backend(&self) -> &str {
        "json"
    }
}

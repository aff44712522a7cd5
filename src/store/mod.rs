use std::sync::Arc;

use log::{info, warn};

use crate::config::{Backend, SiteConfig};
use crate::models::post::Post;

pub mod json_file;
pub mod sqlite;

/// Local-storage shaped persistence. Every read and write of page state
/// goes through here.
/// Implementations: `JsonFileStore` (one JSON object on disk) and
/// `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;

    // ── Key/value ───────────────────────────────────────────────────
    fn item_get(&self, key: &str) -> Option<String>;
    fn item_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn item_remove(&self, key: &str) -> Result<(), String>;

    // ── Posts ───────────────────────────────────────────────────────

    /// Newest first. Absent or corrupt values read as an empty list.
    fn post_list(&self, key: &str) -> Vec<Post> {
        decode_posts(key, self.item_get(key).as_deref())
    }

    /// Put `post` at the front of the list under `key`.
    /// The default is a plain whole-list read-modify-write; backends that
    /// can hold a lock or a transaction across the cycle override it.
    fn post_prepend(&self, key: &str, post: &Post) -> Result<(), String> {
        let next = prepend_encoded(key, self.item_get(key).as_deref(), post)?;
        self.item_set(key, &next)
    }

    // ── Diagnostics ─────────────────────────────────────────────────
    fn db_backend(&self) -> &str;
}

pub fn decode_posts(key: &str, raw: Option<&str>) -> Vec<Post> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Post>>(raw) {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Stored posts under '{}' are unreadable, starting empty: {}", key, e);
            Vec::new()
        }
    }
}

/// Encoded list with `post` in front of whatever `raw` decodes to.
pub fn prepend_encoded(key: &str, raw: Option<&str>, post: &Post) -> Result<String, String> {
    let mut posts = decode_posts(key, raw);
    posts.insert(0, post.clone());
    serde_json::to_string(&posts).map_err(|e| e.to_string())
}

/// Build the configured backend and run its migrations.
pub fn open(config: &SiteConfig) -> Result<Arc<dyn Store>, String> {
    let store: Arc<dyn Store> = match config.backend {
        Backend::Json => Arc::new(json_file::JsonFileStore::new(&config.data_dir)),
        Backend::Sqlite => Arc::new(sqlite::SqliteStore::new_at(&config.db_path)?),
    };
    store.run_migrations()?;
    info!("Store ready ({})", store.db_backend());
    Ok(store)
}

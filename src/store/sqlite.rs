use rusqlite::{params, OptionalExtension, TransactionBehavior};

use crate::db::DbPool;
use crate::models::post::Post;

use super::{prepend_encoded, Store};

/// SQLite-backed implementation of the Store trait.
/// Wraps an r2d2 connection pool over the `local_store` table.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool_at(path)?;
        Ok(Self { pool })
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    // ── Key/value ───────────────────────────────────────────────────

    fn item_get(&self, key: &str) -> Option<String> {
        let conn = self.pool.get().ok()?;
        conn.query_row(
            "SELECT value FROM local_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .ok()
    }

    fn item_set(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO local_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn item_remove(&self, key: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM local_store WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    // ── Posts ───────────────────────────────────────────────────────

    fn post_prepend(&self, key: &str, post: &Post) -> Result<(), String> {
        let mut conn = self.pool.get().map_err(|e| e.to_string())?;
        // IMMEDIATE takes the write lock before the read, so two writers
        // cannot both read the same list
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| e.to_string())?;
        let current: Option<String> = tx
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())?;
        let next = prepend_encoded(key, current.as_deref(), post)?;
        tx.execute(
            "INSERT INTO local_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, next],
        )
        .map_err(|e| e.to_string())?;
        tx.commit().map_err(|e| e.to_string())
    }

    // ── Diagnostics ─────────────────────────────────────────────────

    fn db_backend(&self) -> &str {
        "sqlite"
    }
}

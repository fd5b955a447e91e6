//! SQLite-backed store
//!
//! One `kv_store` table in a WAL-mode SQLite file. Batches run inside a
//! single transaction, which gives `set_many` / `remove_many` their
//! all-or-nothing visibility.

use super::schema::{self, CREATE_MIGRATIONS_TABLE};
use super::KeyValueStore;
use crate::client::error::{ClientError, ClientResult};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DB_DIR_NAME: &str = "feedback-client";
const DB_FILE_NAME: &str = "local.db";

const UPSERT: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Local database connection manager
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create the store in the platform data directory
    pub async fn open_default() -> ClientResult<Self> {
        Self::open(&Self::default_path(None)).await
    }

    /// Open or create the store under `data_dir`, or the platform default
    pub async fn open_in(data_dir: Option<&Path>) -> ClientResult<Self> {
        Self::open(&Self::default_path(data_dir)).await
    }

    /// Open or create the database file at `path`
    ///
    /// Creates the parent directory if needed and initializes the schema.
    pub async fn open(path: &Path) -> ClientResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("cache_size", "1000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.init_schema().await?;

        tracing::debug!("Opened local store at {}", path.display());
        Ok(store)
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn in_memory() -> ClientResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // Every connection would get its own memory database; pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Database file path under `data_dir`, falling back to the platform data directory
    pub fn default_path(data_dir: Option<&Path>) -> PathBuf {
        let mut path = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let mut base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                base.push(DB_DIR_NAME);
                base
            }
        };
        path.push(DB_FILE_NAME);
        path
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> ClientResult<()> {
        sqlx::query(CREATE_MIGRATIONS_TABLE)
            .execute(&self.pool)
            .await?;

        let (current_version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;

        for (version, statement) in schema::migrations_after(current_version) {
            self.apply_migration(*version, statement).await?;
        }
        Ok(())
    }

    async fn apply_migration(&self, version: i64, statement: &str) -> ClientResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(statement).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
            .bind(version)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Applied local store migration {}", version);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        sqlx::query("DELETE FROM kv_store").execute(&self.pool).await?;
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> ClientResult<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(*key)
                .bind(*value)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> ClientResult<()> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM kv_store WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

//! Database Schema Definitions
//!
//! Versioned DDL for the local store. Each migration runs once, inside the
//! transaction that records it in `schema_migrations`.

/// Key-value table holding every persisted client value
pub const CREATE_KV_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

pub const CREATE_MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)";

/// `(version, statement)` in apply order
pub const MIGRATIONS: &[(i64, &str)] = &[(1, CREATE_KV_TABLE)];

/// Migrations newer than the recorded `version`
pub fn migrations_after(version: i64) -> impl Iterator<Item = &'static (i64, &'static str)> {
    MIGRATIONS.iter().filter(move |(v, _)| *v > version)
}

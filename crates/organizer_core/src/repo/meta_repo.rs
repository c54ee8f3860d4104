//! Key/value metadata repository.
//!
//! # Invariants
//! - One value per key; `set_meta` overwrites without keeping history.
//! - Values are stored as JSON text.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

/// Key written once when the database schema is created.
pub const CREATED_AT_KEY: &str = "createdAt";

/// Repository interface for metadata entries.
pub trait MetaRepository {
    /// Returns the value stored for `key`, if any.
    fn get_meta(&mut self, key: &str) -> RepoResult<Option<Value>>;
    /// Inserts or overwrites the value stored for `key`.
    fn set_meta(&mut self, key: &str, value: &Value) -> RepoResult<()>;
}

/// SQLite-backed metadata repository.
pub struct SqliteMetaRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMetaRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Returns the database creation instant seeded by the first migration.
    pub fn database_created_at(&mut self) -> RepoResult<Option<String>> {
        let value = self.get_meta(CREATED_AT_KEY)?;
        Ok(value.and_then(|value| value.as_str().map(str::to_string)))
    }
}

impl MetaRepository for SqliteMetaRepository<'_> {
    fn get_meta(&mut self, key: &str) -> RepoResult<Option<Value>> {
        run_in_transaction(self.conn, &[Collection::Meta], TxMode::ReadOnly, |scope| {
            read_meta(scope.read(Collection::Meta)?, key)
        })
    }

    fn set_meta(&mut self, key: &str, value: &Value) -> RepoResult<()> {
        run_in_transaction(self.conn, &[Collection::Meta], TxMode::ReadWrite, |scope| {
            write_meta(scope.write(Collection::Meta)?, key, value)
        })
    }
}

pub(crate) fn read_meta(conn: &Connection, key: &str) -> RepoResult<Option<Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM meta WHERE key = ?1;", [key], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

pub(crate) fn write_meta(conn: &Connection, key: &str, value: &Value) -> RepoResult<()> {
    let text = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        [key, text.as_str()],
    )?;
    Ok(())
}

pub(crate) fn all_meta(conn: &Connection) -> RepoResult<Vec<(String, Value)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM meta ORDER BY key ASC;")?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let key: String = row.get("key")?;
        let text: String = row.get("value")?;
        entries.push((key, serde_json::from_str(&text)?));
    }
    Ok(entries)
}

//! SQLite key-value layer for formbuilder
//!
//! A single `kv` table stands in for the browser's local storage

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// Durable string-to-string storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn =
            Connection::open(path.as_ref()).context("Failed to open formbuilder database")?;
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  INTEGER NOT NULL
            )
            "#,
            [],
        )
        .context("Failed to create kv table")?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, chrono::Utc::now().timestamp()],
            )
            .with_context(|| format!("Failed to write key {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove key {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_overwrite_remove() -> Result<()> {
        let db = Database::open_in_memory()?;
        assert_eq!(db.get("k")?, None);

        db.set("k", "one")?;
        assert_eq!(db.get("k")?.as_deref(), Some("one"));

        db.set("k", "two")?;
        assert_eq!(db.get("k")?.as_deref(), Some("two"));

        db.remove("k")?;
        assert_eq!(db.get("k")?, None);

        // Removing a missing key is fine
        db.remove("k")?;
        Ok(())
    }

    #[test]
    fn test_set_stamps_updated_at() -> Result<()> {
        let db = Database::open_in_memory()?;
        let before = chrono::Utc::now().timestamp();
        db.set("k", "v")?;

        let stamped: i64 = db.conn.query_row(
            "SELECT updated_at FROM kv WHERE key = ?1",
            params!["k"],
            |row| row.get(0),
        )?;
        assert!(stamped >= before);
        assert!(stamped <= chrono::Utc::now().timestamp());
        Ok(())
    }

    #[test]
    fn test_values_survive_reopen() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("kv.db");

        Database::open(&path)?.set("formFields", "[]")?;
        assert_eq!(Database::open(&path)?.get("formFields")?.as_deref(), Some("[]"));
        Ok(())
    }
}

//! SQLite-backed key-value gateway.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::gateway::{GatewayError, PersistenceGateway};

/// Key the store blob is saved under.
pub const DATA_KEY: &str = "waterSportsTrackerData";

/// Keeps the store blob in a single-row-per-key SQLite table.
pub struct SqliteGateway {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteGateway {
    /// Open or create a database at the default location.
    ///
    /// The default location is `~/.local/share/tidelog/tidelog.db`.
    pub fn open() -> Result<Self, GatewayError> {
        Self::open_at(&Self::default_path())
    }

    /// Open or create a database at a specific path.
    pub fn open_at(path: &Path) -> Result<Self, GatewayError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GatewayError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: path.display().to_string(),
        })
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, GatewayError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: ":memory:".to_string(),
        })
    }

    /// Get the default database path.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tidelog")
            .join("tidelog.db")
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, GatewayError> {
        self.conn.lock().map_err(|_| GatewayError::LockPoisoned)
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
    }
}

impl PersistenceGateway for SqliteGateway {
    fn load(&self) -> Result<Option<String>, GatewayError> {
        let conn = self.conn()?;
        let blob = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![DATA_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn save(&self, blob: &str) -> Result<(), GatewayError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![DATA_KEY, blob, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!(bytes = blob.len(), "Saved store to sqlite");
        Ok(())
    }

    fn location(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_before_save_is_none() {
        let gateway = SqliteGateway::open_in_memory().unwrap();
        assert_eq!(gateway.load().unwrap(), None);
    }

    #[test]
    fn test_save_overwrites() {
        let gateway = SqliteGateway::open_in_memory().unwrap();

        gateway.save(r#"{"a":1}"#).unwrap();
        gateway.save(r#"{"b":2}"#).unwrap();

        assert_eq!(gateway.load().unwrap().as_deref(), Some(r#"{"b":2}"#));
    }

    #[test]
    fn test_reopen_file_keeps_blob() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tidelog.db");

        SqliteGateway::open_at(&path).unwrap().save("{}").unwrap();

        let reopened = SqliteGateway::open_at(&path).unwrap();
        assert_eq!(reopened.load().unwrap().as_deref(), Some("{}"));
        assert!(reopened.location().starts_with("sqlite:"));
    }
}

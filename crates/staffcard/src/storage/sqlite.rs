use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{migrations, Backend, BlobInfo};
use crate::error::{Error, Result};

/// `SQLite`-backed blob storage.
///
/// Each key maps to one row of the `blobs` table. Writes replace the whole
/// row inside a single statement, so a failed write leaves the previous
/// value in place.
#[derive(Debug)]
pub struct SqliteBackend {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("sqlite connection lock poisoned"))
    }
}

impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let blob = self
            .conn()?
            .query_row("SELECT value FROM blobs WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(blob)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn()?.execute(
            r"
            INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, blob, updated_at],
        )?;
        debug!(key, bytes = blob.len(), "Saved blob");
        Ok(())
    }

    fn describe(&self, key: &str) -> Result<Option<BlobInfo>> {
        let row: Option<(i64, String)> = self
            .conn()?
            .query_row(
                "SELECT length(CAST(value AS BLOB)), updated_at FROM blobs WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(size, updated_at)| BlobInfo {
            size_bytes: usize::try_from(size).unwrap_or(0),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_backend() -> SqliteBackend {
        SqliteBackend::open_in_memory().expect("failed to create test backend")
    }

    #[test]
    fn test_open_in_memory() {
        let backend = create_test_backend();
        assert_eq!(backend.path().to_string_lossy(), ":memory:");
        assert_eq!(backend.name(), "sqlite");
    }

    #[test]
    fn test_load_missing_key() {
        let backend = create_test_backend();
        assert!(backend.load("ems_employees_v1").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let backend = create_test_backend();
        backend.save("k", r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(
            backend.load("k").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[test]
    fn test_save_replaces_existing() {
        let backend = create_test_backend();
        backend.save("k", "one").unwrap();
        backend.save("k", "two").unwrap();
        assert_eq!(backend.load("k").unwrap().as_deref(), Some("two"));

        let rows: i64 = backend
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM blobs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_describe() {
        let backend = create_test_backend();
        assert!(backend.describe("k").unwrap().is_none());

        backend.save("k", "héllo").unwrap();
        let info = backend.describe("k").unwrap().unwrap();
        assert_eq!(info.size_bytes, "héllo".len());
        assert!(info.updated_at.is_some());
    }

    #[test]
    fn test_unicode_blob() {
        let backend = create_test_backend();
        let blob = r#"[{"name":"Zoë 世界 🌍"}]"#;
        backend.save("k", blob).unwrap();
        assert_eq!(backend.load("k").unwrap().as_deref(), Some(blob));
    }

    #[test]
    fn test_open_file_based_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("directory.db");

        {
            let backend = SqliteBackend::open(&db_path).unwrap();
            backend.save("k", "persisted").unwrap();
            assert_eq!(backend.path(), db_path);
        }

        let reopened = SqliteBackend::open(&db_path).unwrap();
        assert_eq!(reopened.load("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/directory.db");

        let _backend = SqliteBackend::open(&nested_path).unwrap();
        assert!(nested_path.exists());
    }
}

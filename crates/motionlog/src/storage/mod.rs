//! Storage layer for motionlog.
//!
//! This module provides `SQLite`-based append-only storage for motion
//! events. A [`Storage`] is a short-lived handle: the HTTP handlers open
//! one per request and drop it when the request is done.

pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::entry::{MotionLogEntry, Timestamp};
use crate::error::{Error, Result};

/// How long a connection waits for another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage engine for motion events.
///
/// Rows are only ever inserted. Ids come from `AUTOINCREMENT` and are
/// never reused, so ordering by id is ordering by arrival.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open the database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Does not create the schema; call [`Storage::initialize`] once at
    /// process start for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or configured.
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

        let configure = |conn: &Connection| -> rusqlite::Result<()> {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch(schema::CONNECTION_PRAGMAS)
        };
        configure(&conn).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, conn })
    }

    /// Create an initialized in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        let storage = Self {
            path: PathBuf::from(":memory:"),
            conn,
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Ensure the schema exists.
    ///
    /// Idempotent; safe to call on every process start.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::FILE_PRAGMAS)?;
        for statement in schema::SCHEMA_STATEMENTS {
            self.conn.execute(statement, [])?;
        }
        info!("Database ready at {}", self.path.display());
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one motion event and return its assigned id.
    ///
    /// The row is committed before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be committed.
    pub fn insert(&self, timestamp: &Timestamp) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO motion_logs (timestamp) VALUES (?1)",
            [timestamp],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted motion log with id {}", id);
        Ok(id)
    }

    /// Get all entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<MotionLogEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, timestamp FROM motion_logs ORDER BY id DESC")?;

        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get an entry by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<MotionLogEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, timestamp FROM motion_logs WHERE id = ?1",
                [id],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Count stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM motion_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<MotionLogEntry> {
        Ok(MotionLogEntry {
            id: row.get(0)?,
            timestamp: row.get(1)?,
        })
    }
}

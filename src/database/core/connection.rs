//! Database connection management
//!
//! This module provides the core database connection wrapper used throughout roster.

use crate::database::error::{DalError, DalResult};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around SQLite connections,
/// handling both file-based and in-memory databases with consistent
/// configuration and error handling.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    /// Any failure while opening or configuring the file is reported as
    /// [`DalError::StoreUnavailable`].
    pub fn open(path: Option<&str>) -> DalResult<Self> {
        let conn = match path {
            Some(p) => Connection::open(p).map_err(|e| {
                DalError::StoreUnavailable(format!("Failed to open database at '{}': {}", p, e))
            })?,
            None => Connection::open_in_memory().map_err(|e| {
                DalError::StoreUnavailable(format!("Failed to create in-memory database: {}", e))
            })?,
        };

        let db = DatabaseConn { conn };
        db.configure(path.is_some()).map_err(|e| match e {
            DalError::Store(inner) => DalError::StoreUnavailable(inner.to_string()),
            other => other,
        })?;
        debug!("Opened database at {}", path.unwrap_or(":memory:"));
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &str) -> DalResult<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> DalResult<Self> {
        Self::open(None)
    }

    /// Open an existing database file without writing to it
    ///
    /// The file is never created and its journal mode is left as found.
    pub fn open_read_only(path: &str) -> DalResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| {
                DalError::StoreUnavailable(format!("Failed to open database at '{}': {}", path, e))
            })?;
        conn.busy_timeout(std::time::Duration::ZERO)?;
        debug!("Opened database read-only at {}", path);
        Ok(DatabaseConn { conn })
    }

    fn configure(&self, file_backed: bool) -> DalResult<()> {
        // No retry on a locked file: fail straight away
        self.conn.busy_timeout(std::time::Duration::ZERO)?;

        if file_backed {
            // Reading the pragma result also forces SQLite to touch the file,
            // so a non-database file is rejected here rather than on first use
            let _: String = self
                .conn
                .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        }

        self.conn.execute("PRAGMA foreign_keys=ON", [])?;

        Ok(())
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> DalResult<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> DalResult<bool> {
        table_exists(&self.conn, table_name)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> DalResult<u64> {
        let query = format!("SELECT COUNT(*) FROM \"{}\"", table_name);
        let count: u64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Check whether foreign key enforcement is on for this connection
    pub fn foreign_keys_enabled(&self) -> DalResult<bool> {
        let on: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(on == 1)
    }
}

/// Check if a table exists using any connection (or transaction)
pub(crate) fn table_exists(conn: &Connection, table_name: &str) -> DalResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

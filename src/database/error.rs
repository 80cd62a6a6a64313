//! Error types for the data access layer
//!
//! Every repository and schema operation returns [`DalResult`]. Engine errors
//! are classified into the variants below so callers can tell a key conflict
//! from a missing row or an unreachable database file.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors returned by database operations.
#[derive(Debug, Error)]
pub enum DalError {
    /// Primary-key, unique, foreign-key or NOT NULL constraint failed
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Update or delete targeted a key with no matching row
    #[error("No row in {table} with key {key}")]
    NotFound { table: &'static str, key: i64 },

    /// A report table was materialized twice without being dropped
    #[error("Table '{0}' already exists")]
    AlreadyExists(String),

    /// The database file cannot be opened or is locked
    #[error("Database unavailable: {0}")]
    StoreUnavailable(String),

    /// Any other SQLite error, passed through unchanged
    #[error("SQLite error: {0}")]
    Store(rusqlite::Error),
}

pub type DalResult<T> = Result<T, DalError>;

impl DalError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DalError::ConstraintViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DalError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, DalError::AlreadyExists(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, DalError::StoreUnavailable(_))
    }
}

impl From<rusqlite::Error> for DalError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _) => e.code,
            _ => return DalError::Store(err),
        };

        match code {
            ErrorCode::ConstraintViolation => DalError::ConstraintViolation(err.to_string()),
            ErrorCode::CannotOpen
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::NotADatabase
            | ErrorCode::PermissionDenied
            | ErrorCode::ReadOnly => DalError::StoreUnavailable(err.to_string()),
            _ => DalError::Store(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_constraint_error_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .unwrap();
        conn.execute("INSERT INTO t (id) VALUES (1)", []).unwrap();

        let err: DalError = conn
            .execute("INSERT INTO t (id) VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_other_errors_pass_through() {
        let conn = Connection::open_in_memory().unwrap();
        let err: DalError = conn
            .execute("SELECT * FROM missing_table", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DalError::Store(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err = DalError::NotFound {
            table: "Person",
            key: 42,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No row in Person with key 42");
    }
}

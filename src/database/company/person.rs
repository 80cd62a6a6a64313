//! Person repository
//!
//! CRUD operations for the `Person` table.

use crate::database::error::{DalError, DalResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A row of the `Person` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub person_id: i64,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
}

impl PersonRecord {
    pub fn new(person_id: i64, first_name: &str, second_name: &str, email: &str) -> Self {
        Self {
            person_id,
            first_name: first_name.to_string(),
            second_name: second_name.to_string(),
            email: email.to_string(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            person_id: row.get(0)?,
            first_name: row.get(1)?,
            second_name: row.get(2)?,
            email: row.get(3)?,
        })
    }
}

/// Repository for `Person` rows
pub struct PersonRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PersonRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a person, replacing the non-key columns if `person_id` exists
    pub fn add(&self, person: &PersonRecord) -> DalResult<()> {
        self.conn.execute(
            "INSERT INTO Person (person_id, first_name, second_name, email)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(person_id) DO UPDATE SET
                first_name = excluded.first_name,
                second_name = excluded.second_name,
                email = excluded.email",
            params![
                person.person_id,
                person.first_name,
                person.second_name,
                person.email
            ],
        )?;
        Ok(())
    }

    /// Overwrite the non-key columns of an existing person
    pub fn update(&self, person: &PersonRecord) -> DalResult<()> {
        let changed = self.conn.execute(
            "UPDATE Person SET first_name = ?1, second_name = ?2, email = ?3
             WHERE person_id = ?4",
            params![
                person.first_name,
                person.second_name,
                person.email,
                person.person_id
            ],
        )?;
        if changed == 0 {
            return Err(DalError::NotFound {
                table: "Person",
                key: person.person_id,
            });
        }
        Ok(())
    }

    /// Delete a person by key, returning the number of rows removed
    pub fn delete(&self, person_id: i64) -> DalResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM Person WHERE person_id = ?1", [person_id])?)
    }

    pub fn get(&self, person_id: i64) -> DalResult<Option<PersonRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT person_id, first_name, second_name, email
                 FROM Person WHERE person_id = ?1",
                [person_id],
                PersonRecord::from_row,
            )
            .optional()?)
    }

    /// All persons ordered by key
    pub fn list(&self) -> DalResult<Vec<PersonRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, first_name, second_name, email
             FROM Person ORDER BY person_id",
        )?;
        let rows = stmt.query_map([], PersonRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> DalResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Person", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).ensure_schema().unwrap();
        db
    }

    #[test]
    fn test_add_and_get() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        let john = PersonRecord::new(1, "John", "Doe", "john.doe@example.com");
        repo.add(&john).unwrap();

        assert_eq!(repo.get(1).unwrap(), Some(john));
        assert_eq!(repo.get(2).unwrap(), None);
    }

    #[test]
    fn test_add_replaces_existing_key() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        repo.add(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap();
        let replacement = PersonRecord::new(1, "Johnny", "Doe", "johnny@example.com");
        repo.add(&replacement).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(1).unwrap(), Some(replacement));
        let old_email: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM Person WHERE email = 'john.doe@example.com'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(old_email, 0);
    }

    #[test]
    fn test_duplicate_email_is_constraint_violation() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        repo.add(&PersonRecord::new(1, "John", "Doe", "shared@example.com"))
            .unwrap();
        let err = repo
            .add(&PersonRecord::new(2, "Jane", "Doe", "shared@example.com"))
            .unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_update() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        repo.add(&PersonRecord::new(2, "Jane", "Doe", "jane.doe@example.com"))
            .unwrap();
        let updated = PersonRecord::new(2, "Jane", "UpdatedDoe", "jane.updated@example.com");
        repo.update(&updated).unwrap();

        assert_eq!(repo.get(2).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_missing_key() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        repo.add(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap();
        let err = repo
            .update(&PersonRecord::new(9, "Ghost", "User", "ghost@example.com"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            repo.list().unwrap(),
            vec![PersonRecord::new(1, "John", "Doe", "john.doe@example.com")]
        );
    }

    #[test]
    fn test_delete() {
        let db = setup_test_db();
        let repo = PersonRepository::new(&db.conn);

        repo.add(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap();
        repo.add(&PersonRecord::new(2, "Jane", "Doe", "jane.doe@example.com"))
            .unwrap();

        assert_eq!(repo.delete(1).unwrap(), 1);
        assert_eq!(repo.delete(1).unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get(2).unwrap().is_some());
    }
}

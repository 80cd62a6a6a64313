//! EmployeeCard repository
//!
//! An employee card ties a person to a project and a group for a period of
//! time. All three references are optional; when present they must point at
//! existing rows, since every connection runs with `foreign_keys=ON`.

use crate::database::company::date_column;
use crate::database::error::{DalError, DalResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A row of the `EmployeeCard` table
///
/// `start_date` left as `None` on insert is filled with the current UTC
/// timestamp (`YYYY-MM-DD HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCardRecord {
    pub card_id: i64,
    pub person_id: Option<i64>,
    pub project_id: Option<i64>,
    pub group_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EmployeeCardRecord {
    pub fn new(
        card_id: i64,
        person_id: Option<i64>,
        project_id: Option<i64>,
        group_id: Option<i64>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            card_id,
            person_id,
            project_id,
            group_id,
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            card_id: row.get(0)?,
            person_id: row.get(1)?,
            project_id: row.get(2)?,
            group_id: row.get(3)?,
            start_date: date_column(row, 4)?,
            end_date: date_column(row, 5)?,
        })
    }
}

/// Repository for `EmployeeCard` rows
pub struct EmployeeCardRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EmployeeCardRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a card, replacing the non-key columns if `card_id` exists
    pub fn add(&self, card: &EmployeeCardRecord) -> DalResult<()> {
        self.conn.execute(
            "INSERT INTO EmployeeCard
                (card_id, person_id, project_id, group_id, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, COALESCE(?5, CURRENT_TIMESTAMP), ?6)
             ON CONFLICT(card_id) DO UPDATE SET
                person_id = excluded.person_id,
                project_id = excluded.project_id,
                group_id = excluded.group_id,
                start_date = excluded.start_date,
                end_date = excluded.end_date",
            params![
                card.card_id,
                card.person_id,
                card.project_id,
                card.group_id,
                card.start_date,
                card.end_date
            ],
        )?;
        Ok(())
    }

    /// Overwrite the non-key columns of an existing card
    ///
    /// A `None` start date keeps the stored one.
    pub fn update(&self, card: &EmployeeCardRecord) -> DalResult<()> {
        let changed = self.conn.execute(
            "UPDATE EmployeeCard SET
                person_id = ?1,
                project_id = ?2,
                group_id = ?3,
                start_date = COALESCE(?4, start_date),
                end_date = ?5
             WHERE card_id = ?6",
            params![
                card.person_id,
                card.project_id,
                card.group_id,
                card.start_date,
                card.end_date,
                card.card_id
            ],
        )?;
        if changed == 0 {
            return Err(DalError::NotFound {
                table: "EmployeeCard",
                key: card.card_id,
            });
        }
        Ok(())
    }

    pub fn delete(&self, card_id: i64) -> DalResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM EmployeeCard WHERE card_id = ?1", [card_id])?)
    }

    pub fn get(&self, card_id: i64) -> DalResult<Option<EmployeeCardRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT card_id, person_id, project_id, group_id, start_date, end_date
                 FROM EmployeeCard WHERE card_id = ?1",
                [card_id],
                EmployeeCardRecord::from_row,
            )
            .optional()?)
    }

    pub fn list(&self) -> DalResult<Vec<EmployeeCardRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, person_id, project_id, group_id, start_date, end_date
             FROM EmployeeCard ORDER BY card_id",
        )?;
        let rows = stmt.query_map([], EmployeeCardRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Cards held by one person
    pub fn list_for_person(&self, person_id: i64) -> DalResult<Vec<EmployeeCardRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, person_id, project_id, group_id, start_date, end_date
             FROM EmployeeCard WHERE person_id = ?1 ORDER BY card_id",
        )?;
        let rows = stmt.query_map([person_id], EmployeeCardRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> DalResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM EmployeeCard", [], |row| row.get(0))?;
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
        db.conn
            .execute_batch(
                r#"
                INSERT INTO Person VALUES (1, 'John', 'Doe', 'john.doe@example.com');
                INSERT INTO Person VALUES (2, 'Jane', 'Doe', 'jane.doe@example.com');
                INSERT INTO Projects VALUES (1, 'Project A', '2023-01-01', '2023-12-31');
                INSERT INTO Groups VALUES (1, 'Group 1');
                "#,
            )
            .unwrap();
        db
    }

    #[test]
    fn test_add_and_get() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        let card = EmployeeCardRecord::new(
            1,
            Some(1),
            Some(1),
            Some(1),
            Some("2023-01-01 00:00:00"),
            Some("2023-12-31 23:59:59"),
        );
        repo.add(&card).unwrap();
        assert_eq!(repo.get(1).unwrap(), Some(card));
    }

    #[test]
    fn test_start_date_defaults_to_now() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        repo.add(&EmployeeCardRecord::new(5, Some(1), None, None, None, None))
            .unwrap();
        let stored = repo.get(5).unwrap().unwrap();
        let start = stored.start_date.unwrap();

        // CURRENT_TIMESTAMP format: YYYY-MM-DD HH:MM:SS
        assert_eq!(start.len(), 19);
        let is_recent: bool = db
            .conn
            .query_row(
                "SELECT julianday('now') - julianday(?1) < 1.0",
                [&start],
                |row| row.get(0),
            )
            .unwrap();
        assert!(is_recent);
    }

    #[test]
    fn test_unknown_person_is_constraint_violation() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        let err = repo
            .add(&EmployeeCardRecord::new(
                1,
                Some(99),
                Some(1),
                Some(1),
                None,
                None,
            ))
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_deleting_referenced_person_is_rejected() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);
        repo.add(&EmployeeCardRecord::new(1, Some(1), None, None, None, None))
            .unwrap();

        let err: DalError = db
            .conn
            .execute("DELETE FROM Person WHERE person_id = 1", [])
            .unwrap_err()
            .into();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_update_moves_card() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        repo.add(&EmployeeCardRecord::new(
            2,
            Some(1),
            Some(1),
            Some(1),
            Some("2023-02-01 00:00:00"),
            Some("2023-06-30 23:59:59"),
        ))
        .unwrap();

        repo.update(&EmployeeCardRecord::new(
            2,
            Some(2),
            Some(1),
            None,
            None,
            Some("2023-07-31 23:59:59"),
        ))
        .unwrap();

        assert_eq!(
            repo.get(2).unwrap(),
            Some(EmployeeCardRecord::new(
                2,
                Some(2),
                Some(1),
                None,
                Some("2023-02-01 00:00:00"),
                Some("2023-07-31 23:59:59"),
            ))
        );
        assert_eq!(repo.list_for_person(2).unwrap().len(), 1);
        assert!(repo.list_for_person(1).unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_start_date_and_clears_end_date() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        repo.add(&EmployeeCardRecord::new(
            3,
            Some(1),
            None,
            None,
            Some("2023-03-01 09:00:00"),
            Some("2023-09-30 17:00:00"),
        ))
        .unwrap();
        repo.update(&EmployeeCardRecord::new(3, Some(1), None, None, None, None))
            .unwrap();

        let stored = repo.get(3).unwrap().unwrap();
        assert_eq!(stored.start_date.as_deref(), Some("2023-03-01 09:00:00"));
        assert_eq!(stored.end_date, None);
    }

    #[test]
    fn test_update_and_delete_missing_key() {
        let db = setup_test_db();
        let repo = EmployeeCardRepository::new(&db.conn);

        let err = repo
            .update(&EmployeeCardRecord::new(8, None, None, None, None, None))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.delete(8).unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 0);
    }
}

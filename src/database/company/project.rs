//! Project repository
//!
//! CRUD operations for the `Projects` table. Dates are stored as text
//! (`YYYY-MM-DD`), which is what SQLite's date functions expect.

use crate::database::company::date_column;
use crate::database::error::{DalError, DalResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A row of the `Projects` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: i64,
    pub project_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ProjectRecord {
    pub fn new(
        project_id: i64,
        project_name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            project_id,
            project_name: project_name.to_string(),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            project_id: row.get(0)?,
            project_name: row.get(1)?,
            start_date: date_column(row, 2)?,
            end_date: date_column(row, 3)?,
        })
    }
}

/// Repository for `Projects` rows
pub struct ProjectRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a project, replacing the non-key columns if `project_id` exists
    pub fn add(&self, project: &ProjectRecord) -> DalResult<()> {
        self.conn.execute(
            "INSERT INTO Projects (project_id, project_name, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(project_id) DO UPDATE SET
                project_name = excluded.project_name,
                start_date = excluded.start_date,
                end_date = excluded.end_date",
            params![
                project.project_id,
                project.project_name,
                project.start_date,
                project.end_date
            ],
        )?;
        Ok(())
    }

    /// Overwrite the non-key columns of an existing project
    pub fn update(&self, project: &ProjectRecord) -> DalResult<()> {
        let changed = self.conn.execute(
            "UPDATE Projects SET project_name = ?1, start_date = ?2, end_date = ?3
             WHERE project_id = ?4",
            params![
                project.project_name,
                project.start_date,
                project.end_date,
                project.project_id
            ],
        )?;
        if changed == 0 {
            return Err(DalError::NotFound {
                table: "Projects",
                key: project.project_id,
            });
        }
        Ok(())
    }

    /// Delete a project by key, returning the number of rows removed
    pub fn delete(&self, project_id: i64) -> DalResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM Projects WHERE project_id = ?1", [project_id])?)
    }

    pub fn get(&self, project_id: i64) -> DalResult<Option<ProjectRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT project_id, project_name, start_date, end_date
                 FROM Projects WHERE project_id = ?1",
                [project_id],
                ProjectRecord::from_row,
            )
            .optional()?)
    }

    pub fn list(&self) -> DalResult<Vec<ProjectRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, project_name, start_date, end_date
             FROM Projects ORDER BY project_id",
        )?;
        let rows = stmt.query_map([], ProjectRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> DalResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Projects", [], |row| row.get(0))?;
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
    fn test_add_and_get_with_null_dates() {
        let db = setup_test_db();
        let repo = ProjectRepository::new(&db.conn);

        let a = ProjectRecord::new(1, "Project A", Some("2023-01-01"), Some("2023-12-31"));
        let open_ended = ProjectRecord::new(2, "Project B", Some("2023-02-01"), None);
        repo.add(&a).unwrap();
        repo.add(&open_ended).unwrap();

        assert_eq!(repo.get(1).unwrap(), Some(a));
        assert_eq!(repo.get(2).unwrap(), Some(open_ended));
    }

    #[test]
    fn test_numeric_dates_read_back_as_text() {
        let db = setup_test_db();
        let repo = ProjectRepository::new(&db.conn);
        let reports = crate::database::company::ReportRepository::new(&db.conn);

        // DATE has NUMERIC affinity: "2023" is stored as an integer
        repo.add(&ProjectRecord::new(1, "Year only", Some("2023"), Some("2024")))
            .unwrap();
        let stored_type: String = db
            .conn
            .query_row("SELECT typeof(start_date) FROM Projects", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored_type, "integer");

        let expected = ProjectRecord::new(1, "Year only", Some("2023"), Some("2024"));
        assert_eq!(repo.get(1).unwrap(), Some(expected.clone()));
        assert_eq!(repo.list().unwrap(), vec![expected.clone()]);
        assert_eq!(reports.sort_projects_by_start_date().unwrap(), vec![expected]);
        assert_eq!(
            reports.max_project_end_date().unwrap(),
            Some("2024".to_string())
        );
        assert_eq!(
            reports.min_project_start_date().unwrap(),
            Some("2023".to_string())
        );
    }

    #[test]
    fn test_update_keeps_key() {
        let db = setup_test_db();
        let repo = ProjectRepository::new(&db.conn);

        repo.add(&ProjectRecord::new(
            2,
            "Project B",
            Some("2023-02-01"),
            Some("2023-06-30"),
        ))
        .unwrap();
        let updated = ProjectRecord::new(
            2,
            "UpdatedProject B",
            Some("2023-02-01"),
            Some("2023-07-31"),
        );
        repo.update(&updated).unwrap();

        assert_eq!(repo.list().unwrap(), vec![updated]);
    }

    #[test]
    fn test_update_missing_key() {
        let db = setup_test_db();
        let repo = ProjectRepository::new(&db.conn);

        let err = repo
            .update(&ProjectRecord::new(7, "Nope", None, None))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let db = setup_test_db();
        let repo = ProjectRepository::new(&db.conn);

        repo.add(&ProjectRecord::new(1, "Project A", None, None))
            .unwrap();
        assert_eq!(repo.delete(1).unwrap(), 1);
        assert_eq!(repo.delete(1).unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 0);
    }
}

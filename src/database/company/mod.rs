//! Company database storage
//!
//! This module provides the persistent company database and its repositories:
//! - Person, Projects, Groups and EmployeeCard (CRUD)
//! - Reports over projects and persons (aggregates and materialized tables)

mod employee_card;
mod group;
mod person;
mod project;
mod reports;

pub use employee_card::{EmployeeCardRecord, EmployeeCardRepository};
pub use group::{GroupRecord, GroupRepository};
pub use person::{PersonRecord, PersonRepository};
pub use project::{ProjectRecord, ProjectRepository};
pub use reports::{
    CaseSensitivity, PersonName, ProjectDuration, ReportRepository, ReportTable,
    LONG_PROJECT_MIN_DAYS,
};

use crate::config::RosterConfig;
use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use crate::database::error::DalResult;
use rusqlite::types::Value;
use tracing::info;

/// Default file name of the company database inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "company_database.sqlite3";

/// Read a `DATE`/`TIMESTAMP` column as text
///
/// These columns have NUMERIC affinity, so a value such as `2023` is stored
/// as an integer and would not decode as `String`.
pub(crate) fn date_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<String>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    })
}

/// Main company database handle (SQLite backend)
///
/// `CompanyDatabase` owns one connection for its whole lifetime and hands out
/// short-lived repositories borrowing it. Every operation is its own unit of
/// work: single statements autocommit, and multi-statement operations
/// (schema reset, report materialization) run inside one transaction that
/// commits before returning and rolls back on any error.
///
/// Dropping the handle closes the connection.
pub struct CompanyDatabase {
    db: DatabaseConn,
}

impl CompanyDatabase {
    /// Open the company database at the specified path
    ///
    /// If the database doesn't exist, it will be created. Missing tables are
    /// created; existing ones are left untouched.
    pub fn open(path: &str) -> DalResult<Self> {
        let db = DatabaseConn::open_path(path)?;
        let database = Self { db };
        database.ensure_schema()?;
        Ok(database)
    }

    /// Open the company database from a data directory
    ///
    /// Creates the standard database file path: `{data_dir}/company_database.sqlite3`
    pub fn open_in_dir(data_dir: &str) -> DalResult<Self> {
        let path = format!(
            "{}/{}",
            data_dir.trim_end_matches('/'),
            DEFAULT_DATABASE_FILE
        );
        Self::open(&path)
    }

    /// Open the database configured in `config`
    pub fn from_config(config: &RosterConfig) -> DalResult<Self> {
        Self::open(&config.sqlite_path())
    }

    /// Create an in-memory company database (for testing)
    pub fn open_in_memory() -> DalResult<Self> {
        let db = DatabaseConn::open_in_memory()?;
        let database = Self { db };
        database.ensure_schema()?;
        Ok(database)
    }

    pub fn persons(&self) -> PersonRepository<'_> {
        PersonRepository::new(&self.db.conn)
    }

    pub fn projects(&self) -> ProjectRepository<'_> {
        ProjectRepository::new(&self.db.conn)
    }

    pub fn groups(&self) -> GroupRepository<'_> {
        GroupRepository::new(&self.db.conn)
    }

    pub fn employee_cards(&self) -> EmployeeCardRepository<'_> {
        EmployeeCardRepository::new(&self.db.conn)
    }

    pub fn reports(&self) -> ReportRepository<'_> {
        ReportRepository::new(&self.db.conn)
    }

    pub fn schema(&self) -> SchemaManager<'_> {
        SchemaManager::new(&self.db.conn)
    }

    /// Get the underlying database connection (for advanced queries)
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    /// Create any missing table
    pub fn ensure_schema(&self) -> DalResult<()> {
        let schema = self.schema();
        match schema.check_status()? {
            SchemaStatus::Current => {}
            SchemaStatus::NotInitialized => info!("Initializing company database schema"),
            SchemaStatus::Incomplete { missing } => {
                info!("Creating missing tables: {}", missing.join(", "))
            }
        }
        schema.ensure_schema()
    }

    /// Delete every row and drop every table
    pub fn reset_schema(&self) -> DalResult<()> {
        self.schema().reset_schema()
    }

    pub fn schema_status(&self) -> DalResult<SchemaStatus> {
        self.schema().check_status()
    }

    // -------------------------------------------------------------------------
    // Person
    // -------------------------------------------------------------------------

    pub fn add_person(&self, person: &PersonRecord) -> DalResult<()> {
        self.persons().add(person)
    }

    pub fn update_person(&self, person: &PersonRecord) -> DalResult<()> {
        self.persons().update(person)
    }

    pub fn delete_person(&self, person_id: i64) -> DalResult<usize> {
        self.persons().delete(person_id)
    }

    // -------------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------------

    pub fn add_project(&self, project: &ProjectRecord) -> DalResult<()> {
        self.projects().add(project)
    }

    pub fn update_project(&self, project: &ProjectRecord) -> DalResult<()> {
        self.projects().update(project)
    }

    pub fn delete_project(&self, project_id: i64) -> DalResult<usize> {
        self.projects().delete(project_id)
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    pub fn add_group(&self, group: &GroupRecord) -> DalResult<()> {
        self.groups().add(group)
    }

    pub fn update_group(&self, group: &GroupRecord) -> DalResult<()> {
        self.groups().update(group)
    }

    pub fn delete_group(&self, group_id: i64) -> DalResult<usize> {
        self.groups().delete(group_id)
    }

    // -------------------------------------------------------------------------
    // EmployeeCard
    // -------------------------------------------------------------------------

    pub fn add_employee_card(&self, card: &EmployeeCardRecord) -> DalResult<()> {
        self.employee_cards().add(card)
    }

    pub fn update_employee_card(&self, card: &EmployeeCardRecord) -> DalResult<()> {
        self.employee_cards().update(card)
    }

    pub fn delete_employee_card(&self, card_id: i64) -> DalResult<usize> {
        self.employee_cards().delete(card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> CompanyDatabase {
        let db = CompanyDatabase::open_in_memory().unwrap();
        db.add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap();
        db.add_project(&ProjectRecord::new(
            1,
            "Project A",
            Some("2023-01-01"),
            Some("2023-12-31"),
        ))
        .unwrap();
        db.add_group(&GroupRecord::new(1, "Group 1")).unwrap();
        db.add_employee_card(&EmployeeCardRecord::new(
            1,
            Some(1),
            Some(1),
            Some(1),
            Some("2023-01-01 00:00:00"),
            Some("2023-12-31 23:59:59"),
        ))
        .unwrap();
        db
    }

    #[test]
    fn test_open_in_memory() {
        let db = CompanyDatabase::open_in_memory().unwrap();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::Current);
        assert_eq!(db.persons().count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_person_with_new_email() {
        let db = sample_db();
        db.add_person(&PersonRecord::new(1, "John", "Doe", "john.new@example.com"))
            .unwrap();

        let stored = db.persons().get(1).unwrap().unwrap();
        assert_eq!(stored.email, "john.new@example.com");
        assert_eq!(db.reports().count_persons().unwrap(), 1);
        // the card still references the replaced person
        assert_eq!(db.employee_cards().list_for_person(1).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_card_then_person() {
        let db = sample_db();

        assert!(db.delete_person(1).unwrap_err().is_constraint_violation());
        assert_eq!(db.delete_employee_card(1).unwrap(), 1);
        assert_eq!(db.delete_person(1).unwrap(), 1);
        assert_eq!(db.delete_person(1).unwrap(), 0);
    }

    #[test]
    fn test_update_helpers_report_not_found() {
        let db = sample_db();

        assert!(db
            .update_project(&ProjectRecord::new(2, "Missing", None, None))
            .unwrap_err()
            .is_not_found());
        assert!(db
            .update_group(&GroupRecord::new(2, "Missing"))
            .unwrap_err()
            .is_not_found());
        db.update_group(&GroupRecord::new(1, "Renamed")).unwrap();
        assert_eq!(db.groups().get(1).unwrap().unwrap().group_name, "Renamed");
    }

    #[test]
    fn test_reset_then_ensure() {
        let db = sample_db();
        db.reports().persist_projects_by_duration().unwrap();

        db.reset_schema().unwrap();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::NotInitialized);

        db.ensure_schema().unwrap();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::Current);
        assert_eq!(db.persons().count().unwrap(), 0);
        assert!(!db.reports().report_exists(ReportTable::LongProjects).unwrap());
    }

    #[test]
    fn test_file_database_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        {
            let db = CompanyDatabase::open_in_dir(data_dir).unwrap();
            db.add_person(&PersonRecord::new(7, "Eva", "Miller", "eva.miller@example.com"))
                .unwrap();
        }

        let db = CompanyDatabase::open_in_dir(data_dir).unwrap();
        assert_eq!(
            db.persons().get(7).unwrap(),
            Some(PersonRecord::new(7, "Eva", "Miller", "eva.miller@example.com"))
        );
    }

    #[test]
    fn test_locked_database_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let writer = CompanyDatabase::open_in_dir(data_dir).unwrap();
        let blocked = CompanyDatabase::open_in_dir(data_dir).unwrap();

        writer.connection().execute_batch("BEGIN IMMEDIATE").unwrap();
        let err = blocked
            .add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap_err();
        assert!(err.is_store_unavailable());

        writer.connection().execute_batch("ROLLBACK").unwrap();
        blocked
            .add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
            .unwrap();
    }
}

//! Report queries over projects and persons
//!
//! Every report comes in two forms: a read-only query returning rows, and a
//! `persist_*` variant that materializes the same rows into a report table
//! with `CREATE TABLE ... AS SELECT`. Persisting is create-if-absent: a
//! second call fails with [`DalError::AlreadyExists`] until the table is
//! dropped with [`ReportRepository::drop_report`].
//!
//! Project durations are `julianday(end_date) - julianday(start_date)` in
//! days. Projects missing either date take no part in duration reports.

use crate::database::company::date_column;
use crate::database::company::project::ProjectRecord;
use crate::database::core::table_exists;
use crate::database::error::{DalError, DalResult};
use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Projects lasting longer than this many days count as long-running
pub const LONG_PROJECT_MIN_DAYS: f64 = 150.0;

const DURATION_EXPR: &str = "julianday(end_date) - julianday(start_date)";

const LONG_PROJECTS_QUERY: &str = r#"
    SELECT project_id, project_name, start_date, end_date,
           julianday(end_date) - julianday(start_date) AS duration_days
    FROM Projects
    WHERE start_date IS NOT NULL AND end_date IS NOT NULL
      AND julianday(end_date) - julianday(start_date) > ?1
    ORDER BY duration_days DESC, project_id
"#;

const PROJECTS_BY_START_QUERY: &str = r#"
    SELECT project_id, project_name, start_date, end_date
    FROM Projects
    ORDER BY start_date IS NULL, start_date, project_id
"#;

const NAME_PREFIX_QUERY: &str = r#"
    SELECT first_name, second_name
    FROM Person
    WHERE substr(first_name, 1, length(?1)) = ?1
       OR substr(second_name, 1, length(?1)) = ?1
    ORDER BY person_id
"#;

const NAME_PREFIX_NOCASE_QUERY: &str = r#"
    SELECT first_name, second_name
    FROM Person
    WHERE first_name LIKE ?1 ESCAPE '\'
       OR second_name LIKE ?1 ESCAPE '\'
    ORDER BY person_id
"#;

/// A project together with its duration in days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDuration {
    pub project_id: i64,
    pub project_name: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_days: f64,
}

/// A (first_name, second_name) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub second_name: String,
}

/// How name prefixes are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// Exact character comparison
    #[default]
    Sensitive,
    /// ASCII case folding, as SQLite's `LIKE` does
    Insensitive,
}

/// Materialized report tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTable {
    LongProjects,
    ProjectsByStart,
    NamePrefix,
}

impl ReportTable {
    pub const ALL: [ReportTable; 3] = [
        ReportTable::LongProjects,
        ReportTable::ProjectsByStart,
        ReportTable::NamePrefix,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            ReportTable::LongProjects => "report_long_projects",
            ReportTable::ProjectsByStart => "report_projects_by_start",
            ReportTable::NamePrefix => "report_name_prefix",
        }
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for ReportTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long-projects" | "report_long_projects" => Ok(ReportTable::LongProjects),
            "by-start" | "report_projects_by_start" => Ok(ReportTable::ProjectsByStart),
            "names" | "report_name_prefix" => Ok(ReportTable::NamePrefix),
            _ => Err(format!(
                "Unknown report table '{}'. Valid tables: long-projects, by-start, names",
                s
            )),
        }
    }
}

/// Escape `LIKE` wildcards so the prefix matches literally
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Read-only reports and their materialized counterparts
pub struct ReportRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ReportRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn count_persons(&self) -> DalResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Person", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Total duration of all fully dated projects; 0 when there are none
    pub fn sum_project_durations(&self) -> DalResult<f64> {
        let sql = format!(
            "SELECT TOTAL({}) FROM Projects
             WHERE start_date IS NOT NULL AND end_date IS NOT NULL",
            DURATION_EXPR
        );
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Mean duration of all fully dated projects; `None` when there are none
    pub fn average_project_duration(&self) -> DalResult<Option<f64>> {
        let sql = format!(
            "SELECT AVG({}) FROM Projects
             WHERE start_date IS NOT NULL AND end_date IS NOT NULL",
            DURATION_EXPR
        );
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    pub fn max_project_end_date(&self) -> DalResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT MAX(end_date) FROM Projects", [], |row| {
                date_column(row, 0)
            })?)
    }

    pub fn min_project_start_date(&self) -> DalResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT MIN(start_date) FROM Projects", [], |row| {
                date_column(row, 0)
            })?)
    }

    /// Projects longer than [`LONG_PROJECT_MIN_DAYS`], longest first
    pub fn group_projects_by_duration(&self) -> DalResult<Vec<ProjectDuration>> {
        let mut stmt = self.conn.prepare(LONG_PROJECTS_QUERY)?;
        let rows = stmt.query_map([LONG_PROJECT_MIN_DAYS], |row| {
            Ok(ProjectDuration {
                project_id: row.get(0)?,
                project_name: row.get(1)?,
                start_date: date_column(row, 2)?.unwrap_or_default(),
                end_date: date_column(row, 3)?.unwrap_or_default(),
                duration_days: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All projects by start date, undated projects last
    pub fn sort_projects_by_start_date(&self) -> DalResult<Vec<ProjectRecord>> {
        let mut stmt = self.conn.prepare(PROJECTS_BY_START_QUERY)?;
        let rows = stmt.query_map([], ProjectRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Persons whose first or second name starts with `prefix` (case-sensitive)
    pub fn filter_names_starting_with(&self, prefix: &str) -> DalResult<Vec<PersonName>> {
        self.filter_names_starting_with_case(prefix, CaseSensitivity::Sensitive)
    }

    pub fn filter_names_starting_with_case(
        &self,
        prefix: &str,
        case: CaseSensitivity,
    ) -> DalResult<Vec<PersonName>> {
        let (sql, param) = Self::name_prefix_query(prefix, case);
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([&param], |row| {
            Ok(PersonName {
                first_name: row.get(0)?,
                second_name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Normalize a date-like value with SQLite's `date()`
    ///
    /// Returns `None` when SQLite cannot interpret the input.
    pub fn format_date(&self, value: &str) -> DalResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT date(?1)", [value], |row| row.get(0))?)
    }

    /// Materialize [`Self::group_projects_by_duration`] into `report_long_projects`
    pub fn persist_projects_by_duration(&self) -> DalResult<u64> {
        self.persist(
            ReportTable::LongProjects,
            LONG_PROJECTS_QUERY,
            &[&LONG_PROJECT_MIN_DAYS as &dyn ToSql],
        )
    }

    /// Materialize [`Self::sort_projects_by_start_date`] into `report_projects_by_start`
    pub fn persist_projects_by_start_date(&self) -> DalResult<u64> {
        self.persist(ReportTable::ProjectsByStart, PROJECTS_BY_START_QUERY, &[])
    }

    /// Materialize a name prefix filter into `report_name_prefix`
    pub fn persist_names_starting_with(
        &self,
        prefix: &str,
        case: CaseSensitivity,
    ) -> DalResult<u64> {
        let (sql, param) = Self::name_prefix_query(prefix, case);
        self.persist(ReportTable::NamePrefix, sql, &[&param as &dyn ToSql])
    }

    /// Drop a report table; returns whether it existed
    pub fn drop_report(&self, report: ReportTable) -> DalResult<bool> {
        let existed = table_exists(self.conn, report.table_name())?;
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {}", report.table_name()), [])?;
        Ok(existed)
    }

    pub fn report_exists(&self, report: ReportTable) -> DalResult<bool> {
        table_exists(self.conn, report.table_name())
    }

    fn name_prefix_query(prefix: &str, case: CaseSensitivity) -> (&'static str, String) {
        match case {
            CaseSensitivity::Sensitive => (NAME_PREFIX_QUERY, prefix.to_string()),
            CaseSensitivity::Insensitive => {
                (NAME_PREFIX_NOCASE_QUERY, like_prefix_pattern(prefix))
            }
        }
    }

    fn persist(&self, report: ReportTable, select: &str, params: &[&dyn ToSql]) -> DalResult<u64> {
        let table = report.table_name();
        let tx = self.conn.unchecked_transaction()?;

        if table_exists(&tx, table)? {
            return Err(DalError::AlreadyExists(table.to_string()));
        }

        tx.execute(&format!("CREATE TABLE {} AS {}", table, select), params)?;
        let rows: u64 = tx.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        tx.commit()?;

        info!("Materialized {} rows into {}", rows, table);
        Ok(rows)
    }
}

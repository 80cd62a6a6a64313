//! Database schema management
//!
//! This module provides schema definitions and management for the company database.
//! All tables are defined here to ensure consistency and enable cross-table queries.

use crate::database::core::connection::table_exists;
use crate::database::error::DalResult;
use rusqlite::Connection;
use tracing::info;

/// Schema definitions for all tables in the company database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    pub const PERSON_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS Person (
            person_id INT PRIMARY KEY,
            first_name TEXT NOT NULL,
            second_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL
        );
    "#;

    pub const PROJECTS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS Projects (
            project_id INT PRIMARY KEY,
            project_name TEXT NOT NULL,
            start_date DATE,
            end_date DATE
        );
    "#;

    pub const GROUPS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS Groups (
            group_id INT PRIMARY KEY,
            group_name TEXT NOT NULL
        );
    "#;

    /// EmployeeCard must be created after the tables it references
    pub const EMPLOYEE_CARD_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS EmployeeCard (
            card_id INT PRIMARY KEY,
            person_id INT,
            project_id INT,
            group_id INT,
            start_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            end_date TIMESTAMP,
            FOREIGN KEY (person_id) REFERENCES Person(person_id),
            FOREIGN KEY (project_id) REFERENCES Projects(project_id),
            FOREIGN KEY (group_id) REFERENCES Groups(group_id)
        );
    "#;

    /// Entity tables in creation order
    pub const TABLES: &'static [&'static str] = &["Person", "Projects", "Groups", "EmployeeCard"];

    /// Materialized report tables, dropped together with the entity tables
    pub const REPORT_TABLES: &'static [&'static str] = &[
        "report_long_projects",
        "report_projects_by_start",
        "report_name_prefix",
    ];
}

/// Schema manager for the company database
///
/// Creates the entity tables and tears them down. There is no versioning:
/// an existing table is left exactly as found.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create any missing entity table
    ///
    /// Safe to call repeatedly; existing tables are never altered.
    pub fn ensure_schema(&self) -> DalResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(SchemaDefinitions::PERSON_TABLE)?;
        tx.execute_batch(SchemaDefinitions::PROJECTS_TABLE)?;
        tx.execute_batch(SchemaDefinitions::GROUPS_TABLE)?;
        tx.execute_batch(SchemaDefinitions::EMPLOYEE_CARD_TABLE)?;
        tx.commit()?;
        Ok(())
    }

    /// Remove every row and drop every table, reports included
    ///
    /// EmployeeCard rows go first so that foreign key checks never see a
    /// dangling reference. Runs in one transaction.
    pub fn reset_schema(&self) -> DalResult<()> {
        info!("Resetting company database schema");
        let tx = self.conn.unchecked_transaction()?;

        for table in SchemaDefinitions::REPORT_TABLES {
            tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
        }

        if table_exists(&tx, "EmployeeCard")? {
            tx.execute("DELETE FROM EmployeeCard", [])?;
        }
        for table in ["Person", "Projects", "Groups"] {
            if table_exists(&tx, table)? {
                tx.execute(&format!("DELETE FROM {}", table), [])?;
            }
        }

        tx.execute("DROP TABLE IF EXISTS EmployeeCard", [])?;
        tx.execute("DROP TABLE IF EXISTS Person", [])?;
        tx.execute("DROP TABLE IF EXISTS Projects", [])?;
        tx.execute("DROP TABLE IF EXISTS Groups", [])?;

        tx.commit()?;
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> DalResult<SchemaStatus> {
        let mut missing = Vec::new();
        for table in SchemaDefinitions::TABLES {
            if !table_exists(self.conn, table)? {
                missing.push(table.to_string());
            }
        }

        if missing.is_empty() {
            Ok(SchemaStatus::Current)
        } else if missing.len() == SchemaDefinitions::TABLES.len() {
            Ok(SchemaStatus::NotInitialized)
        } else {
            Ok(SchemaStatus::Incomplete { missing })
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// None of the entity tables exist
    NotInitialized,

    /// All entity tables exist
    Current,

    /// Some entity tables are missing
    Incomplete { missing: Vec<String> },
}

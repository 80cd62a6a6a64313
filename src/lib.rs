#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Roster - a small company staffing database
//!
//! Roster keeps persons, projects, groups and employee cards in a single
//! SQLite file and offers CRUD operations plus a handful of reports over
//! them. It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Database layer only | `rusqlite` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | The `roster` binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: All database functionality
//!   - `core`: SQLite connection management and schema definitions
//!   - `company`: Entity repositories and reports
//!   - `error`: [`DalError`] taxonomy
//! - **[`config`]**: Configuration management
//! - **[`output`]**: Output formats shared by the CLI
//!
//! # Insert semantics
//!
//! `add_*` operations are upserts keyed on the primary key: adding a record
//! whose key already exists replaces all of its other columns. Conflicts on
//! any other constraint (a duplicate e-mail, a dangling foreign key) fail
//! with [`DalError::ConstraintViolation`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use roster::database::{CompanyDatabase, PersonRecord, ProjectRecord};
//!
//! let db = CompanyDatabase::open_in_memory()?;
//! db.add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))?;
//! db.add_project(&ProjectRecord::new(1, "Project A", Some("2023-01-01"), Some("2023-12-31")))?;
//!
//! assert_eq!(db.reports().sum_project_durations()?, 364.0);
//!
//! // Compute, or materialize into a report table
//! let long = db.reports().group_projects_by_duration()?;
//! let rows = db.reports().persist_projects_by_duration()?;
//! ```

pub mod config;
pub mod database;
pub mod output;

// =============================================================================
// Configuration
// =============================================================================

pub use config::RosterConfig;

pub use config::{
    format_size, get_database_info, DatabaseInfo, EntityTable, TableInfo, TableStatus,
};

// =============================================================================
// Database Module - Re-export commonly used types
// =============================================================================

pub use database::{CompanyDatabase, DalError, DalResult};

pub use database::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus};

pub use database::{
    EmployeeCardRecord, EmployeeCardRepository, GroupRecord, GroupRepository, PersonRecord,
    PersonRepository, ProjectRecord, ProjectRepository,
};

pub use database::{
    CaseSensitivity, PersonName, ProjectDuration, ReportRepository, ReportTable,
    LONG_PROJECT_MIN_DAYS,
};

pub use output::OutputFormat;

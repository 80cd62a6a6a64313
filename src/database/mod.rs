//! Database module
//!
//! This module provides all database functionality for roster, organized into:
//!
//! - **core**: Core database infrastructure (SQLite connections, schema management)
//! - **company**: The company database (entities, CRUD, reports)
//! - **error**: The error taxonomy shared by every operation
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/              # Foundation
//! │   ├── connection     # SQLite DatabaseConn wrapper
//! │   └── schema         # Table definitions, ensure/reset
//! │
//! ├── company/           # Persistent storage
//! │   ├── person         # Person CRUD
//! │   ├── project        # Projects CRUD
//! │   ├── group          # Groups CRUD
//! │   ├── employee_card  # EmployeeCard CRUD (foreign keys)
//! │   └── reports        # Aggregates and materialized report tables
//! │
//! └── error              # DalError
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use roster::database::{CompanyDatabase, PersonRecord};
//!
//! let db = CompanyDatabase::open_in_dir("~/.roster")?;
//! db.add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))?;
//!
//! let total_days = db.reports().sum_project_durations()?;
//! ```

pub mod company;
pub mod core;
pub mod error;

// SQLite connection and schema management
pub use core::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus};

// Errors
pub use error::{DalError, DalResult};

// Company database (main entry point)
pub use company::{CompanyDatabase, DEFAULT_DATABASE_FILE};

// Entity records and repositories
pub use company::{
    EmployeeCardRecord, EmployeeCardRepository, GroupRecord, GroupRepository, PersonRecord,
    PersonRepository, ProjectRecord, ProjectRepository,
};

// Reports
pub use company::{
    CaseSensitivity, PersonName, ProjectDuration, ReportRepository, ReportTable,
    LONG_PROJECT_MIN_DAYS,
};

//! Core database infrastructure
//!
//! This module provides the foundational database components used throughout roster:
//! - `DatabaseConn`: Core SQLite connection wrapper with configuration
//! - `SchemaManager`: Schema creation and teardown
//! - `SchemaStatus`: Schema state enumeration

mod connection;
mod schema;

pub(crate) use connection::table_exists;
pub use connection::DatabaseConn;
pub use schema::{SchemaDefinitions, SchemaManager, SchemaStatus};

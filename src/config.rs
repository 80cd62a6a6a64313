use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::database::DEFAULT_DATABASE_FILE;

pub struct RosterConfig {
    /// Path to the directory holding the company database
    pub data_dir: String,

    /// File name of the SQLite database inside `data_dir`
    pub database_file: String,
}

const EMPTY_CONFIG: &str = r#"### roster configuration file

### directory holding the company database
# data_dir = "~/.roster"

### database file name inside data_dir
# database_file = "company_database.sqlite3"
"#;

impl Default for RosterConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.roster", home_dir),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl RosterConfig {
    /// Function to create and initialize a new configuration
    ///
    /// Sources, later ones winning: the TOML file (created with a commented
    /// template when missing), then `ROSTER_*` environment variables.
    pub fn new(path: &Option<String>) -> Result<RosterConfig> {
        let mut builder = Config::builder();

        // By default use $HOME/.roster/roster.toml as the configuration file path
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();

        let roster_dir = format!("{}/.roster", home_dir.as_str());

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(
                        config::File::with_name(path_str).format(config::FileFormat::Toml),
                    );
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(roster_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create roster directory: {}", e))?;
                let p = format!("{}/roster.toml", roster_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `ROSTER_DATA_DIR=/tmp/roster roster person list`
        builder = builder.add_source(config::Environment::with_prefix("ROSTER"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p, &home_dir),
            None => roster_dir,
        };
        std::fs::create_dir_all(data_dir.as_str())
            .map_err(|e| anyhow!("Unable to create data directory {}: {}", data_dir, e))?;

        let database_file = config
            .get("database_file")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string());

        Ok(RosterConfig {
            data_dir,
            database_file,
        })
    }

    /// Configuration rooted at an explicit data directory
    pub fn with_data_dir(data_dir: &str) -> Self {
        Self {
            data_dir: data_dir.to_string(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }

    /// Point the configuration at an explicit database file
    pub fn with_database_path(self, path: &str) -> Self {
        let path = Path::new(path);
        let data_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().to_string(),
            _ => ".".to_string(),
        };
        let database_file = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or(self.database_file);
        Self {
            data_dir,
            database_file,
        }
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/{}", data_dir, self.database_file)
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.roster/roster.toml", home_dir)
    }
}

fn expand_home(path: &str, home_dir: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) => format!("{}{}", home_dir, rest),
        None => path.to_string(),
    }
}

// =============================================================================
// Database Info Types (used by the status and config commands)
// =============================================================================

/// Entity tables reported on by `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTable {
    Person,
    Projects,
    Groups,
    EmployeeCard,
}

impl EntityTable {
    pub fn all() -> Vec<EntityTable> {
        vec![
            EntityTable::Person,
            EntityTable::Projects,
            EntityTable::Groups,
            EntityTable::EmployeeCard,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityTable::Person => "Person",
            EntityTable::Projects => "Projects",
            EntityTable::Groups => "Groups",
            EntityTable::EmployeeCard => "EmployeeCard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EntityTable::Person => "Employees and their e-mail addresses",
            EntityTable::Projects => "Projects with optional start and end dates",
            EntityTable::Groups => "Organizational groups",
            EntityTable::EmployeeCard => "Assignments of persons to projects and groups",
        }
    }
}

impl std::fmt::Display for EntityTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of one entity table
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Table exists and has rows
    Ready,
    /// Table exists but is empty
    Empty,
    /// Table does not exist
    Missing,
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableStatus::Ready => write!(f, "ready"),
            TableStatus::Empty => write!(f, "empty"),
            TableStatus::Missing => write!(f, "missing"),
        }
    }
}

/// Information about an entity table
#[derive(Debug, Serialize, Clone)]
pub struct TableInfo {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u64>,
    pub status: TableStatus,
}

/// Information about the SQLite database file
#[derive(Debug, Serialize, Clone)]
pub struct DatabaseInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub schema_initialized: bool,
    pub tables: Vec<TableInfo>,
    pub reports: Vec<String>,
}

/// Inspect the configured database without creating or altering it
pub fn get_database_info(config: &RosterConfig) -> DatabaseInfo {
    use crate::database::{DatabaseConn, ReportRepository, ReportTable, SchemaManager, SchemaStatus};

    let sqlite_path = config.sqlite_path();
    let exists = Path::new(&sqlite_path).exists();
    let size_bytes = if exists {
        std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
    } else {
        None
    };

    let db = if exists {
        DatabaseConn::open_read_only(&sqlite_path).ok()
    } else {
        None
    };

    let schema_initialized = db
        .as_ref()
        .and_then(|db| SchemaManager::new(&db.conn).check_status().ok())
        .map(|status| status == SchemaStatus::Current)
        .unwrap_or(false);

    let tables = EntityTable::all()
        .into_iter()
        .map(|table| {
            let record_count = db.as_ref().and_then(|db| {
                match db.table_exists(table.name()) {
                    Ok(true) => db.table_count(table.name()).ok(),
                    _ => None,
                }
            });
            let status = match record_count {
                Some(count) if count > 0 => TableStatus::Ready,
                Some(_) => TableStatus::Empty,
                None => TableStatus::Missing,
            };
            TableInfo {
                name: table.name().to_string(),
                description: table.description().to_string(),
                record_count,
                status,
            }
        })
        .collect();

    let reports = match db.as_ref() {
        Some(db) => {
            let repo = ReportRepository::new(&db.conn);
            ReportTable::ALL
                .iter()
                .filter(|r| repo.report_exists(**r).unwrap_or(false))
                .map(|r| r.table_name().to_string())
                .collect()
        }
        None => Vec::new(),
    };

    DatabaseInfo {
        path: sqlite_path,
        exists,
        size_bytes,
        schema_initialized,
        tables,
        reports,
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{CompanyDatabase, PersonRecord};

    #[test]
    fn test_default_config() {
        let config = RosterConfig::default();
        assert!(config.data_dir.ends_with("/.roster"));
        assert_eq!(config.database_file, "company_database.sqlite3");
    }

    #[test]
    fn test_paths() {
        let config = RosterConfig::with_data_dir("/test/dir/");
        assert_eq!(config.sqlite_path(), "/test/dir/company_database.sqlite3");

        let config = RosterConfig::with_data_dir("/test/dir").with_database_path("/tmp/staff.db");
        assert_eq!(config.data_dir, "/tmp");
        assert_eq!(config.sqlite_path(), "/tmp/staff.db");

        let config = RosterConfig::with_data_dir("/test/dir").with_database_path("staff.db");
        assert_eq!(config.sqlite_path(), "./staff.db");
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config_path = dir.path().join("roster.toml");
        std::fs::write(
            &config_path,
            format!(
                "data_dir = \"{}\"\ndatabase_file = \"staff.db\"\n",
                data_dir.to_str().unwrap()
            ),
        )
        .unwrap();

        let config = RosterConfig::new(&Some(config_path.to_str().unwrap().to_string())).unwrap();
        assert_eq!(config.data_dir, data_dir.to_str().unwrap());
        assert_eq!(config.database_file, "staff.db");
        assert!(data_dir.exists());
    }

    #[test]
    fn test_missing_config_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("new.toml");

        RosterConfig::new(&Some(config_path.to_str().unwrap().to_string())).unwrap();
        let written = std::fs::read_to_string(&config_path).unwrap();
        assert!(written.starts_with("### roster configuration file"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("~/.roster", "/home/me"), "/home/me/.roster");
        assert_eq!(expand_home("/var/lib/roster", "/home/me"), "/var/lib/roster");
    }

    #[test]
    fn test_database_info_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RosterConfig::with_data_dir(dir.path().to_str().unwrap());

        let info = get_database_info(&config);
        assert!(!info.exists);
        assert!(!info.schema_initialized);
        assert!(info.tables.iter().all(|t| t.status == TableStatus::Missing));
        // inspecting must not create the file
        assert!(!Path::new(&config.sqlite_path()).exists());
    }

    #[test]
    fn test_database_info_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = RosterConfig::with_data_dir(dir.path().to_str().unwrap());
        {
            let db = CompanyDatabase::from_config(&config).unwrap();
            db.add_person(&PersonRecord::new(1, "John", "Doe", "john.doe@example.com"))
                .unwrap();
        }

        let info = get_database_info(&config);
        assert!(info.exists);
        assert!(info.schema_initialized);
        assert_eq!(info.tables[0].record_count, Some(1));
        assert_eq!(info.tables[0].status, TableStatus::Ready);
        assert_eq!(info.tables[1].status, TableStatus::Empty);
        assert!(info.reports.is_empty());
    }

    #[test]
    fn test_database_info_leaves_journal_mode_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = RosterConfig::with_data_dir(dir.path().to_str().unwrap());
        {
            let conn = rusqlite::Connection::open(config.sqlite_path()).unwrap();
            conn.execute_batch(
                "CREATE TABLE Person (person_id INT PRIMARY KEY, first_name TEXT);
                 INSERT INTO Person VALUES (1, 'John');",
            )
            .unwrap();
        }

        let info = get_database_info(&config);
        assert!(info.exists);
        assert!(!info.schema_initialized);
        assert_eq!(info.tables[0].record_count, Some(1));

        let conn = rusqlite::Connection::open(config.sqlite_path()).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "delete");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_table_status_display() {
        assert_eq!(format!("{}", TableStatus::Ready), "ready");
        assert_eq!(format!("{}", TableStatus::Empty), "empty");
        assert_eq!(format!("{}", TableStatus::Missing), "missing");
    }
}

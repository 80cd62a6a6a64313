//! Group repository

use crate::database::error::{DalError, DalResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A row of the `Groups` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub group_id: i64,
    pub group_name: String,
}

impl GroupRecord {
    pub fn new(group_id: i64, group_name: &str) -> Self {
        Self {
            group_id,
            group_name: group_name.to_string(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            group_id: row.get(0)?,
            group_name: row.get(1)?,
        })
    }
}

/// Repository for `Groups` rows
pub struct GroupRepository<'a> {
    conn: &'a Connection,
}

impl<'a> GroupRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a group, replacing its name if `group_id` exists
    pub fn add(&self, group: &GroupRecord) -> DalResult<()> {
        self.conn.execute(
            "INSERT INTO Groups (group_id, group_name) VALUES (?1, ?2)
             ON CONFLICT(group_id) DO UPDATE SET group_name = excluded.group_name",
            params![group.group_id, group.group_name],
        )?;
        Ok(())
    }

    pub fn update(&self, group: &GroupRecord) -> DalResult<()> {
        let changed = self.conn.execute(
            "UPDATE Groups SET group_name = ?1 WHERE group_id = ?2",
            params![group.group_name, group.group_id],
        )?;
        if changed == 0 {
            return Err(DalError::NotFound {
                table: "Groups",
                key: group.group_id,
            });
        }
        Ok(())
    }

    pub fn delete(&self, group_id: i64) -> DalResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM Groups WHERE group_id = ?1", [group_id])?)
    }

    pub fn get(&self, group_id: i64) -> DalResult<Option<GroupRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT group_id, group_name FROM Groups WHERE group_id = ?1",
                [group_id],
                GroupRecord::from_row,
            )
            .optional()?)
    }

    pub fn list(&self) -> DalResult<Vec<GroupRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT group_id, group_name FROM Groups ORDER BY group_id")?;
        let rows = stmt.query_map([], GroupRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> DalResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Groups", [], |row| row.get(0))?;
        Ok(count)
    }
}

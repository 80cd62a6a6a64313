use clap::{Args, Subcommand};
use roster::{GroupRecord, OutputFormat, RosterConfig};
use tabled::Tabled;

use super::{exit_with, open_database, print_done, print_record, print_records};

/// Arguments for the Group command
#[derive(Args)]
pub struct GroupArgs {
    #[clap(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Add a group, replacing any group with the same id
    Add {
        /// Group id
        id: i64,
        /// Group name
        name: String,
    },

    /// Rename an existing group
    Update {
        /// Group id
        id: i64,
        /// Group name
        name: String,
    },

    /// Delete a group by id
    Delete {
        /// Group id
        id: i64,
    },

    /// Show one group
    Get {
        /// Group id
        id: i64,
    },

    /// List all groups
    List,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "id")]
    group_id: i64,
    group_name: String,
}

impl From<&GroupRecord> for GroupRow {
    fn from(g: &GroupRecord) -> Self {
        GroupRow {
            group_id: g.group_id,
            group_name: g.group_name.clone(),
        }
    }
}

pub fn run(config: &RosterConfig, args: GroupArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        GroupCommands::Add { id, name } => {
            let record = GroupRecord::new(id, &name);
            if let Err(e) = db.add_group(&record) {
                exit_with(e);
            }
            print_done(output_format, &format!("Group {} saved", id), &record);
        }
        GroupCommands::Update { id, name } => {
            let record = GroupRecord::new(id, &name);
            if let Err(e) = db.update_group(&record) {
                exit_with(e);
            }
            print_done(output_format, &format!("Group {} updated", id), &record);
        }
        GroupCommands::Delete { id } => match db.delete_group(id) {
            Ok(deleted) => print_done(
                output_format,
                &format!("Deleted {} group(s) with id {}", deleted, id),
                &deleted,
            ),
            Err(e) => exit_with(e),
        },
        GroupCommands::Get { id } => match db.groups().get(id) {
            Ok(group) => {
                print_record(group, "Group", id, output_format, |r| GroupRow::from(r))
            }
            Err(e) => exit_with(e),
        },
        GroupCommands::List => match db.groups().list() {
            Ok(groups) => print_records(&groups, output_format, |r| GroupRow::from(r)),
            Err(e) => exit_with(e),
        },
    }
}

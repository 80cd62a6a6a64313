use clap::{Args, Subcommand};
use roster::output::display_opt;
use roster::{OutputFormat, ProjectRecord, RosterConfig};
use tabled::Tabled;

use super::{exit_with, open_database, print_done, print_record, print_records};

/// Arguments for the Project command
#[derive(Args)]
pub struct ProjectArgs {
    #[clap(subcommand)]
    pub command: ProjectCommands,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Add a project, replacing any project with the same id
    Add(ProjectFields),

    /// Update an existing project
    Update(ProjectFields),

    /// Delete a project by id
    Delete {
        /// Project id
        id: i64,
    },

    /// Show one project
    Get {
        /// Project id
        id: i64,
    },

    /// List all projects
    List,
}

#[derive(Args)]
pub struct ProjectFields {
    /// Project id
    pub id: i64,

    /// Project name
    pub name: String,

    /// Start date, YYYY-MM-DD
    #[clap(short, long)]
    pub start: Option<String>,

    /// End date, YYYY-MM-DD
    #[clap(short, long)]
    pub end: Option<String>,
}

impl ProjectFields {
    fn to_record(&self) -> ProjectRecord {
        ProjectRecord::new(
            self.id,
            &self.name,
            self.start.as_deref(),
            self.end.as_deref(),
        )
    }
}

#[derive(Tabled)]
pub(crate) struct ProjectRow {
    #[tabled(rename = "id")]
    project_id: i64,
    project_name: String,
    start_date: String,
    end_date: String,
}

impl From<&ProjectRecord> for ProjectRow {
    fn from(p: &ProjectRecord) -> Self {
        ProjectRow {
            project_id: p.project_id,
            project_name: p.project_name.clone(),
            start_date: display_opt(&p.start_date),
            end_date: display_opt(&p.end_date),
        }
    }
}

pub fn run(config: &RosterConfig, args: ProjectArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        ProjectCommands::Add(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.add_project(&record) {
                exit_with(e);
            }
            print_done(
                output_format,
                &format!("Project {} saved", record.project_id),
                &record,
            );
        }
        ProjectCommands::Update(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.update_project(&record) {
                exit_with(e);
            }
            print_done(
                output_format,
                &format!("Project {} updated", record.project_id),
                &record,
            );
        }
        ProjectCommands::Delete { id } => match db.delete_project(id) {
            Ok(deleted) => print_done(
                output_format,
                &format!("Deleted {} project(s) with id {}", deleted, id),
                &deleted,
            ),
            Err(e) => exit_with(e),
        },
        ProjectCommands::Get { id } => match db.projects().get(id) {
            Ok(project) => {
                print_record(project, "Project", id, output_format, |r| ProjectRow::from(r))
            }
            Err(e) => exit_with(e),
        },
        ProjectCommands::List => match db.projects().list() {
            Ok(projects) => print_records(&projects, output_format, |r| ProjectRow::from(r)),
            Err(e) => exit_with(e),
        },
    }
}

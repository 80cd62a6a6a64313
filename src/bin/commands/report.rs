use clap::{Args, Subcommand};
use roster::output::display_opt;
use roster::{
    CaseSensitivity, OutputFormat, PersonName, ProjectDuration, ReportTable, RosterConfig,
    LONG_PROJECT_MIN_DAYS,
};
use serde::Serialize;
use tabled::Tabled;

use super::project::ProjectRow;
use super::{exit_with, open_database, print_done, print_records};

/// Arguments for the Report command
#[derive(Args)]
pub struct ReportArgs {
    #[clap(subcommand)]
    pub command: ReportCommands,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Number of persons
    CountPersons,

    /// Total and average project duration in days
    Durations,

    /// Earliest project start and latest project end
    DateRange,

    /// Projects lasting longer than 150 days, longest first
    LongProjects {
        /// Save the rows into the report_long_projects table
        #[clap(long)]
        persist: bool,
    },

    /// Projects ordered by start date
    ByStart {
        /// Save the rows into the report_projects_by_start table
        #[clap(long)]
        persist: bool,
    },

    /// Persons whose first or second name starts with a prefix
    Names {
        /// Name prefix
        prefix: String,

        /// Compare ignoring ASCII case
        #[clap(short, long)]
        ignore_case: bool,

        /// Save the rows into the report_name_prefix table
        #[clap(long)]
        persist: bool,
    },

    /// Drop a report table: long-projects, by-start or names
    Drop {
        /// Report table to drop
        #[clap(value_name = "TABLE")]
        table: ReportTable,
    },

    /// Normalize a date or timestamp to YYYY-MM-DD
    FormatDate {
        /// Value to format
        value: String,
    },
}

#[derive(Serialize)]
struct CountSummary {
    persons: u64,
}

#[derive(Tabled)]
struct CountRow {
    persons: u64,
}

#[derive(Serialize)]
struct DurationSummary {
    total_days: f64,
    average_days: Option<f64>,
}

#[derive(Tabled)]
struct DurationRow {
    total_days: String,
    average_days: String,
}

#[derive(Serialize)]
struct DateRange {
    min_start_date: Option<String>,
    max_end_date: Option<String>,
}

#[derive(Tabled)]
struct DateRangeRow {
    min_start_date: String,
    max_end_date: String,
}

#[derive(Serialize)]
struct FormattedDate {
    input: String,
    date: Option<String>,
}

#[derive(Tabled)]
struct FormattedDateRow {
    input: String,
    date: String,
}

#[derive(Tabled)]
struct ProjectDurationRow {
    #[tabled(rename = "id")]
    project_id: i64,
    project_name: String,
    start_date: String,
    end_date: String,
    duration_days: String,
}

impl From<&ProjectDuration> for ProjectDurationRow {
    fn from(p: &ProjectDuration) -> Self {
        ProjectDurationRow {
            project_id: p.project_id,
            project_name: p.project_name.clone(),
            start_date: p.start_date.clone(),
            end_date: p.end_date.clone(),
            duration_days: format_days(p.duration_days),
        }
    }
}

#[derive(Tabled)]
struct PersonNameRow {
    first_name: String,
    second_name: String,
}

impl From<&PersonName> for PersonNameRow {
    fn from(p: &PersonName) -> Self {
        PersonNameRow {
            first_name: p.first_name.clone(),
            second_name: p.second_name.clone(),
        }
    }
}

fn format_days(days: f64) -> String {
    format!("{:.1}", days)
}

pub fn run(config: &RosterConfig, args: ReportArgs, output_format: OutputFormat) {
    let db = open_database(config);
    let reports = db.reports();

    match args.command {
        ReportCommands::CountPersons => match reports.count_persons() {
            Ok(persons) => print_records(&[CountSummary { persons }], output_format, |s| {
                CountRow { persons: s.persons }
            }),
            Err(e) => exit_with(e),
        },
        ReportCommands::Durations => {
            let summary = reports.sum_project_durations().and_then(|total_days| {
                Ok(DurationSummary {
                    total_days,
                    average_days: reports.average_project_duration()?,
                })
            });
            match summary {
                Ok(summary) => print_records(&[summary], output_format, |s| DurationRow {
                    total_days: format_days(s.total_days),
                    average_days: display_opt(&s.average_days.map(format_days)),
                }),
                Err(e) => exit_with(e),
            }
        }
        ReportCommands::DateRange => {
            let range = reports.min_project_start_date().and_then(|min_start_date| {
                Ok(DateRange {
                    min_start_date,
                    max_end_date: reports.max_project_end_date()?,
                })
            });
            match range {
                Ok(range) => print_records(&[range], output_format, |r| DateRangeRow {
                    min_start_date: display_opt(&r.min_start_date),
                    max_end_date: display_opt(&r.max_end_date),
                }),
                Err(e) => exit_with(e),
            }
        }
        ReportCommands::LongProjects { persist } => {
            if persist {
                persist_report(
                    ReportTable::LongProjects,
                    reports.persist_projects_by_duration(),
                    output_format,
                );
                return;
            }
            match reports.group_projects_by_duration() {
                Ok(projects) => {
                    if output_format.is_table() {
                        println!("Projects longer than {} days:", LONG_PROJECT_MIN_DAYS);
                    }
                    print_records(&projects, output_format, |r| ProjectDurationRow::from(r))
                }
                Err(e) => exit_with(e),
            }
        }
        ReportCommands::ByStart { persist } => {
            if persist {
                persist_report(
                    ReportTable::ProjectsByStart,
                    reports.persist_projects_by_start_date(),
                    output_format,
                );
                return;
            }
            match reports.sort_projects_by_start_date() {
                Ok(projects) => print_records(&projects, output_format, |r| ProjectRow::from(r)),
                Err(e) => exit_with(e),
            }
        }
        ReportCommands::Names {
            prefix,
            ignore_case,
            persist,
        } => {
            let case = if ignore_case {
                CaseSensitivity::Insensitive
            } else {
                CaseSensitivity::Sensitive
            };
            if persist {
                persist_report(
                    ReportTable::NamePrefix,
                    reports.persist_names_starting_with(&prefix, case),
                    output_format,
                );
                return;
            }
            match reports.filter_names_starting_with_case(&prefix, case) {
                Ok(names) => print_records(&names, output_format, |r| PersonNameRow::from(r)),
                Err(e) => exit_with(e),
            }
        }
        ReportCommands::Drop { table } => match reports.drop_report(table) {
            Ok(true) => print_done(output_format, &format!("Dropped {}", table), &true),
            Ok(false) => print_done(
                output_format,
                &format!("{} does not exist", table),
                &false,
            ),
            Err(e) => exit_with(e),
        },
        ReportCommands::FormatDate { value } => match reports.format_date(&value) {
            Ok(date) => {
                let formatted = FormattedDate { input: value, date };
                print_records(&[formatted], output_format, |f| FormattedDateRow {
                    input: f.input.clone(),
                    date: display_opt(&f.date),
                })
            }
            Err(e) => exit_with(e),
        },
    }
}

fn persist_report(
    table: ReportTable,
    result: roster::DalResult<u64>,
    output_format: OutputFormat,
) {
    match result {
        Ok(rows) => print_done(
            output_format,
            &format!("Saved {} row(s) into {}", rows, table),
            &rows,
        ),
        Err(e) if e.is_already_exists() => {
            eprintln!(
                "{} already exists; drop it first with `roster report drop {}`",
                table,
                table
            );
            std::process::exit(1);
        }
        Err(e) => exit_with(e),
    }
}

pub mod card;
pub mod config;
pub mod database;
pub mod group;
pub mod person;
pub mod project;
pub mod report;

use roster::{CompanyDatabase, DalError, OutputFormat, RosterConfig};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Open the configured company database, exiting on failure
pub(crate) fn open_database(config: &RosterConfig) -> CompanyDatabase {
    match CompanyDatabase::from_config(config) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", config.sqlite_path(), e);
            std::process::exit(1);
        }
    }
}

/// Print an error from the data access layer and exit
pub(crate) fn exit_with(e: DalError) -> ! {
    eprintln!("ERROR: {}", e);
    std::process::exit(1);
}

/// Print records in the requested format
///
/// JSON variants serialize the records themselves; the other formats render
/// the display rows produced by `to_row`.
pub(crate) fn print_records<T, R, F>(records: &[T], format: OutputFormat, to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if let Some(rendered) = format.render_json(records) {
        match rendered {
            Ok(s) => {
                if !s.is_empty() {
                    println!("{}", s)
                }
            }
            Err(e) => eprintln!("Error serializing records: {}", e),
        }
        return;
    }

    let rows: Vec<R> = records.iter().map(to_row).collect();
    match format {
        OutputFormat::Psv => {
            println!("{}", R::headers().join("|"));
            for row in &rows {
                println!("{}", row.fields().join("|"));
            }
        }
        OutputFormat::Markdown => {
            println!("{}", Table::new(rows).with(Style::markdown()));
        }
        _ => {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }
}

/// Print a single optional record, or a message when it does not exist
pub(crate) fn print_record<T, R, F>(
    record: Option<T>,
    what: &str,
    key: i64,
    format: OutputFormat,
    to_row: F,
) where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match record {
        Some(r) => print_records(&[r], format, to_row),
        None => {
            eprintln!("{} {} not found", what, key);
            std::process::exit(1);
        }
    }
}

/// Print a one-line confirmation, or a JSON object for the JSON formats
pub(crate) fn print_done<T: Serialize>(format: OutputFormat, message: &str, value: &T) {
    if format.is_json() {
        let json = serde_json::json!({ "result": message, "value": value });
        match format {
            OutputFormat::JsonPretty => match serde_json::to_string_pretty(&json) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("Error serializing result: {}", e),
            },
            _ => println!("{}", json),
        }
    } else {
        println!("{}", message);
    }
}

use roster::{format_size, get_database_info, DatabaseInfo, OutputFormat, RosterConfig};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{exit_with, open_database, print_done};

#[derive(Tabled)]
struct TableRow {
    table: String,
    status: String,
    records: String,
    description: String,
}

pub fn run_init(config: &RosterConfig, output_format: OutputFormat) {
    let db = open_database(config);
    match db.ensure_schema() {
        Ok(()) => print_done(
            output_format,
            &format!("Database ready at {}", config.sqlite_path()),
            &config.sqlite_path(),
        ),
        Err(e) => exit_with(e),
    }
}

pub fn run_status(config: &RosterConfig, output_format: OutputFormat) {
    let info = get_database_info(config);

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing status: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing status: {}", e),
        },
        _ => print_status_table(&info, output_format),
    }
}

fn print_status_table(info: &DatabaseInfo, output_format: OutputFormat) {
    println!("Roster Database Status");
    println!("======================\n");

    println!("SQLite Database:");
    println!("  Path:           {}", info.path);
    println!(
        "  Status:         {}",
        if info.exists { "exists" } else { "not created" }
    );
    if let Some(size) = info.size_bytes {
        println!("  Size:           {}", format_size(size));
    }
    println!(
        "  Schema:         {}",
        if info.schema_initialized {
            "initialized"
        } else {
            "not initialized"
        }
    );
    println!();

    let rows: Vec<TableRow> = info
        .tables
        .iter()
        .map(|t| TableRow {
            table: t.name.clone(),
            status: t.status.to_string(),
            records: t
                .record_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            description: t.description.clone(),
        })
        .collect();
    println!("Tables:");
    match output_format {
        OutputFormat::Markdown => println!("{}", Table::new(rows).with(Style::markdown())),
        _ => println!("{}", Table::new(rows).with(Style::rounded())),
    }
    println!();

    if info.reports.is_empty() {
        println!("Reports:          none");
    } else {
        println!("Reports:          {}", info.reports.join(", "));
    }

    if !info.exists {
        eprintln!();
        eprintln!("Tips:");
        eprintln!("  Run `roster init` to create the database");
    }
}

pub fn run_reset(config: &RosterConfig, yes: bool, output_format: OutputFormat) {
    if !yes {
        eprintln!(
            "This deletes every row and drops every table in {}",
            config.sqlite_path()
        );
        eprintln!("Re-run with --yes to confirm");
        std::process::exit(1);
    }

    let db = open_database(config);
    match db.reset_schema() {
        Ok(()) => print_done(
            output_format,
            &format!("Reset database at {}", config.sqlite_path()),
            &config.sqlite_path(),
        ),
        Err(e) => exit_with(e),
    }
}

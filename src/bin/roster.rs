#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::{Parser, Subcommand};
use roster::*;
use tracing::Level;

mod commands;

use commands::card::CardArgs;
use commands::config::ConfigArgs;
use commands::group::GroupArgs;
use commands::person::PersonArgs;
use commands::project::ProjectArgs;
use commands::report::ReportArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.roster/roster.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Use this database file instead of the configured one
    #[clap(long, global = true)]
    db: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the company database and any missing table
    Init,

    /// Show database file, table and report status
    Status,

    /// Delete all data and drop every table
    Reset {
        /// Confirm the reset
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Manage persons
    Person(PersonArgs),

    /// Manage projects
    Project(ProjectArgs),

    /// Manage groups
    Group(GroupArgs),

    /// Manage employee cards
    Card(CardArgs),

    /// Aggregates and report tables
    Report(ReportArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match RosterConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if let Some(db) = &cli.db {
        config = config.with_database_path(db);
    }

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let format = cli.format;

    match cli.command {
        Commands::Init => commands::database::run_init(&config, format),
        Commands::Status => commands::database::run_status(&config, format),
        Commands::Reset { yes } => commands::database::run_reset(&config, yes, format),
        Commands::Config(args) => commands::config::run(&config, args, format),
        Commands::Person(args) => commands::person::run(&config, args, format),
        Commands::Project(args) => commands::project::run(&config, args, format),
        Commands::Group(args) => commands::group::run(&config, args, format),
        Commands::Card(args) => commands::card::run(&config, args, format),
        Commands::Report(args) => commands::report::run(&config, args, format),
    }
}

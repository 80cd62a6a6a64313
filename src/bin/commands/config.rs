use clap::Args;
use roster::{format_size, get_database_info, OutputFormat, RosterConfig};
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also list the files in the data directory
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    config_file_exists: bool,
    data_dir: String,
    database_file: String,
    database_path: String,
    database_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<FileInfo>>,
}

#[derive(Debug, Serialize)]
struct FileInfo {
    name: String,
    size_bytes: u64,
}

pub fn run(config: &RosterConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let config_file = RosterConfig::config_file_path();
    let db_info = get_database_info(config);

    let files = if verbose {
        let mut file_list = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&config.data_dir) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        file_list.push(FileInfo {
                            name: entry.file_name().to_string_lossy().to_string(),
                            size_bytes: metadata.len(),
                        });
                    }
                }
            }
        }
        file_list.sort_by(|a, b| a.name.cmp(&b.name));
        Some(file_list)
    } else {
        None
    };

    let config_info = ConfigInfo {
        config_file_exists: Path::new(&config_file).exists(),
        config_file,
        data_dir: config.data_dir.clone(),
        database_file: config.database_file.clone(),
        database_path: db_info.path,
        database_exists: db_info.exists,
        database_size_bytes: db_info.size_bytes,
        files,
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&config_info)
        {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing config info: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&config_info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing config info: {}", e),
        },
        _ => print_config_table(&config_info, verbose),
    }
}

fn print_config_table(info: &ConfigInfo, verbose: bool) {
    println!("Roster Configuration");
    println!("====================\n");

    println!("General:");
    println!(
        "  Config file:    {}{}",
        info.config_file,
        if info.config_file_exists {
            ""
        } else {
            " (not found)"
        }
    );
    println!("  Data dir:       {}", info.data_dir);
    println!();

    println!("SQLite Database:");
    println!("  File name:      {}", info.database_file);
    println!("  Path:           {}", info.database_path);
    println!(
        "  Status:         {}",
        if info.database_exists {
            "exists"
        } else {
            "not created"
        }
    );
    if let Some(size) = info.database_size_bytes {
        println!("  Size:           {}", format_size(size));
    }

    if verbose {
        if let Some(ref files) = info.files {
            println!();
            println!("Data Directory Files:");
            println!("  {:<40} {:>12}", "Name", "Size");
            println!("  {}", "-".repeat(54));
            for file in files {
                println!("  {:<40} {:>12}", file.name, format_size(file.size_bytes));
            }
        }
    }

    eprintln!();
    eprintln!("Tips:");
    eprintln!("  Use --verbose (-v) to see all files in the data directory");
    eprintln!("  Use --format json for machine-readable output");
    eprintln!("  Set ROSTER_DATA_DIR or edit ~/.roster/roster.toml to move the database");
}

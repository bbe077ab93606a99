// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Vault: interactive file cataloging
//!
//! Analyze a file, confirm or override the suggested metadata, and record it
//! in the vault catalog.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use vault::analyzers::AnalyzerRegistry;
use vault::config::AppConfig;
use vault::db::{Database, FileField, FileRecord, Lookup};
use vault::workflow::{summary_line, Outcome, Session};
use vault::{index, search, Result, VaultError};

/// Vault CLI - interactive file cataloging
#[derive(Parser, Debug)]
#[command(name = "vault")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "2.0.0")]
#[command(about = "Catalog files into a local metadata vault", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Vault root directory (overrides config and VAULT_PATH)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive menu (default)
    Interactive,

    /// Catalog a single file
    Process {
        /// File to analyze and catalog
        path: PathBuf,
    },

    /// Search the catalog
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Show one record
    Show {
        /// Record id
        id: i64,
    },

    /// List all records
    List,

    /// Change one field of a record
    Update {
        /// Record id
        id: i64,

        /// Field name (description, tags, status, category, sensitivity, notes, filename, path)
        field: FileField,

        /// New value
        value: String,
    },

    /// Export the catalog to a JSON file
    Export {
        /// Output file
        output: PathBuf,
    },

    /// Show vault, database and reader status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Prompts go to stdout, so logs stay on stderr and default to warnings
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env();
    if let Some(vault) = &cli.vault {
        config.vault_path = vault.to_string_lossy().into_owned();
    }
    debug!("Vault root: {}", config.vault_path);

    match cli.command {
        Some(Commands::Config { action }) => run_config_command(config, action),
        Some(Commands::Status) => run_status(&config),
        command => {
            let db = Database::open(config.database_path())?;
            info!("Database: {:?}", db.path());
            run_catalog_command(&config, &db, command)
        }
    }
}

/// Commands that work against the catalog
fn run_catalog_command(
    config: &AppConfig,
    db: &Database,
    command: Option<Commands>,
) -> Result<()> {
    let registry = AnalyzerRegistry::new(config);
    let stdin = io::stdin();

    match command {
        None | Some(Commands::Interactive) => {
            let mut session = Session::new(db, &registry, stdin.lock(), io::stdout());
            session.run_menu()
        }
        Some(Commands::Process { path }) => {
            let mut session = Session::new(db, &registry, stdin.lock(), io::stdout());
            match session.process_new_file(&path.to_string_lossy())? {
                Outcome::MissingFile => Err(VaultError::FileNotFound(path.display().to_string())),
                Outcome::Duplicate => Err(VaultError::DuplicatePath(path.display().to_string())),
                outcome => {
                    debug!("Process finished: {:?}", outcome);
                    Ok(())
                }
            }
        }
        Some(Commands::Search { term }) => {
            print_records(&search::search(db, &term));
            Ok(())
        }
        Some(Commands::List) => {
            print_records(&db.find(Lookup::All));
            Ok(())
        }
        Some(Commands::Show { id }) => {
            let record = db.get(id).ok_or(VaultError::UnknownRecord(id))?;
            print_record(&record);
            Ok(())
        }
        Some(Commands::Update { id, field, value }) => run_update(db, id, field, &value),
        Some(Commands::Export { output }) => {
            let records = db.find(Lookup::All);
            index::save_index(&output, &index::export_document(&records)?)?;
            println!("Exported {} records to {:?}", records.len(), output);
            Ok(())
        }
        Some(Commands::Status) | Some(Commands::Config { .. }) => Ok(()),
    }
}

fn run_update(db: &Database, id: i64, field: FileField, value: &str) -> Result<()> {
    db.try_update_field(id, field, value)?;
    println!("✅ Updated {} of record {}", field, id);
    Ok(())
}

fn print_records(records: &[FileRecord]) {
    if records.is_empty() {
        println!("No results found.");
    }
    for record in records {
        println!("{}", summary_line(record));
    }
}

fn print_record(record: &FileRecord) {
    println!("ID:           {}", record.id);
    println!("Filename:     {}", record.filename);
    println!("Path:         {}", record.path);
    println!("Description:  {}", record.description);
    println!("Content type: {}", record.content_type);
    println!("Tags:         {}", record.tags);
    println!("Sensitivity:  {}", record.sensitivity);
    println!("Status:       {}", record.status);
    println!("Notes:        {}", record.custom_fields);
    println!("Created:      {}", record.date_created);
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
    }

    Ok(())
}

/// Run status check
fn run_status(config: &AppConfig) -> Result<()> {
    println!("Vault v2.0.0 Status");
    println!("===================");
    println!("Vault path: {}", config.vault_path);

    let db_path = config.database_path();
    if db_path.exists() {
        match Database::open(&db_path) {
            Ok(db) => {
                println!("\nDatabase ({}):", db_path.display());
                println!("  Records: {}", db.count());
            }
            Err(e) => println!("\nDatabase: ✗ Error - {}", e),
        }
    } else {
        println!("\nDatabase ({}): not created yet", db_path.display());
    }

    println!("\nAnalyzers:");
    for (name, available) in AnalyzerRegistry::new(config).capabilities() {
        let mark = if available { "✓" } else { "✗ unavailable" };
        println!("  {} {}", name, mark);
    }

    Ok(())
}

//! SlotDB CLI
//!
//! Command-line collaborator: one command per invocation against a data file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use slotdb::protocol::{Command, Payload, Response, Status};
use slotdb::{Config, Field, Record, RecordStore, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// SlotDB CLI
#[derive(Parser, Debug)]
#[command(name = "slotdb-cli")]
#[command(about = "Fixed-width record store with an O(1) id index")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "students.db")]
    db: PathBuf,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty database (overwrites an existing one)
    Create,

    /// Add a record
    Add {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        grade: f64,
        #[arg(long, default_value = "1")]
        course: i32,
    },

    /// Search active records by field
    Search {
        /// id, name, isActive, averageGrade or cours
        #[arg(value_parser = parse_field)]
        field: Field,
        value: String,
    },

    /// Delete active records by field
    Delete {
        #[arg(value_parser = parse_field)]
        field: Field,
        value: String,
    },

    /// Rewrite the record with id KEY
    Edit {
        key: i32,
        #[arg(long)]
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        grade: f64,
        #[arg(long, default_value = "1")]
        course: i32,
    },

    /// List all active records
    List,

    /// Compare active records against the index
    Check,

    /// Persist the index
    Save,

    /// Delete every record
    Clear,

    /// Back up data and index files
    Backup { dest: PathBuf },

    /// Restore from a backup (writes <stem>_restored.db in the current directory)
    Restore { backup: PathBuf },

    /// Export active records as CSV
    Export { csv: PathBuf },

    /// Delete the database and its index
    Remove,
}

fn parse_field(s: &str) -> Result<Field, String> {
    s.parse().map_err(|e: slotdb::SlotError| e.to_string())
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slotdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OsBuffered
    };
    let config = match Config::builder().sync_strategy(strategy).build() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut store = RecordStore::new(config);
    let db = args.db;

    let needs_open = !matches!(
        args.command,
        Commands::Create | Commands::Restore { .. } | Commands::Remove
    );
    if needs_open {
        let response = store.handle(Command::Open { path: db.clone() });
        if !response.is_ok() {
            return report(&response);
        }
    }
    let command = to_command(args.command, &db);

    tracing::debug!("Running {} against {}", command.name(), db.display());
    let response = store.handle(command);
    let code = report(&response);

    if let Err(e) = store.close() {
        tracing::error!("Failed to close {}: {}", db.display(), e);
        return ExitCode::FAILURE;
    }
    code
}

fn to_command(command: Commands, db: &Path) -> Command {
    match command {
        Commands::Create => Command::Create { path: db.to_path_buf() },
        Commands::Remove => Command::Remove { path: db.to_path_buf() },
        Commands::Restore { backup } => Command::Restore { path: backup },
        Commands::Add {
            id,
            name,
            grade,
            course,
        } => Command::Add {
            record: Record::new(id, name, grade, course),
        },
        Commands::Search { field, value } => Command::Search { field, value },
        Commands::Delete { field, value } => Command::Delete { field, value },
        Commands::Edit {
            key,
            id,
            name,
            grade,
            course,
        } => Command::Edit {
            key,
            record: Record::new(id, name, grade, course),
        },
        Commands::List => Command::GetAll,
        Commands::Check => Command::CheckIntegrity,
        Commands::Save => Command::Save,
        Commands::Clear => Command::Clear,
        Commands::Backup { dest } => Command::Backup { path: dest },
        Commands::Export { csv } => Command::ExportCsv { path: csv },
    }
}

/// Print a response and pick the exit code
fn report(response: &Response) -> ExitCode {
    match response.status {
        Status::Ok => {
            print_payload(&response.payload);
            ExitCode::SUCCESS
        }
        Status::Rejected | Status::Error => {
            eprintln!("error: {}", response.message.as_deref().unwrap_or("unknown error"));
            ExitCode::FAILURE
        }
    }
}

fn print_payload(payload: &Payload) {
    match payload {
        Payload::None => println!("ok"),
        Payload::Offset(offset) => println!("added at offset {}", offset),
        Payload::Count(n) => println!("{} record(s)", n),
        Payload::Path(path) => println!("restored to {}", path.display()),
        Payload::Integrity(report) => {
            println!(
                "{}: {} active / {} indexed ({} slots)",
                if report.is_consistent() { "consistent" } else { "MISMATCH" },
                report.active_records,
                report.indexed_ids,
                report.total_slots
            );
        }
        Payload::Records(records) => {
            println!("{:>8}  {:<30} {:>6} {:>8} {:>6}", "ID", "Name", "Active", "AvgGrade", "Course");
            for r in records {
                println!(
                    "{:>8}  {:<30} {:>6} {:>8.2} {:>6}",
                    r.id,
                    r.name,
                    if r.is_active { "yes" } else { "no" },
                    r.average_grade,
                    r.course
                );
            }
            println!("{} record(s)", records.len());
        }
    }
}

//! filedb CLI
//!
//! Command-line tools for filedb database directories.
//!
//! # Commands
//!
//! - `list` - List collections, optionally with record counts
//! - `dump` - Print the records of a collection
//! - `insert` - Append a record to a collection
//! - `drop` - Delete a collection

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// filedb command-line database tools.
#[derive(Parser)]
#[command(name = "filedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections in the database
    List {
        /// Show the record count of each collection
        #[arg(short, long)]
        counts: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the records of a collection, one per line
    Dump {
        /// Collection name
        collection: String,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Append a record to a collection
    Insert {
        /// Collection name
        collection: String,

        /// Record content (must be a single line)
        record: String,
    },

    /// Delete a collection and its file
    Drop {
        /// Collection name
        collection: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::List { counts, format } => {
            let path = cli.path.ok_or("Database path required for list")?;
            commands::list::run(&path, counts, &format)?;
        }
        Commands::Dump { collection, limit } => {
            let path = cli.path.ok_or("Database path required for dump")?;
            commands::dump::run(&path, &collection, limit)?;
        }
        Commands::Insert { collection, record } => {
            let path = cli.path.ok_or("Database path required for insert")?;
            commands::insert::run(&path, &collection, &record)?;
        }
        Commands::Drop { collection } => {
            let path = cli.path.ok_or("Database path required for drop")?;
            commands::drop::run(&path, &collection)?;
        }
        Commands::Version => {
            println!("filedb CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("filedb Core v{}", filedb_core::VERSION);
        }
    }

    Ok(())
}

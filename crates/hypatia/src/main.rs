//! Hypatia CLI - citation analytics from the command line.
//!
//! Hypatia keeps a bibliographic citation graph in SQLite and answers
//! citation-count, impact-factor and author-linkage queries over it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Hypatia: citation graph analytics over a bibliographic store.
#[derive(Parser)]
#[command(name = "hypatia")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Database file (defaults to hypatia.db in the current directory)
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk-load articles from a JSON Lines file (one article per line)
    Load {
        /// Input file
        file: PathBuf,
    },

    /// Show how often an article is cited
    Citations {
        /// Article pmid
        pmid: i64,

        /// Restrict to citations received in one year
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute a journal's impact factor for a year
    Impact {
        /// Journal id
        journal: String,

        /// Target year
        year: i32,
    },

    /// Simulate adding an article and report the impact factor its journal
    /// would have; the store is left untouched
    Simulate {
        /// JSON file holding one article record
        file: PathBuf,
    },

    /// Minimum citation hops between two authors' articles
    Link {
        /// First author's fore name
        fore_a: String,

        /// First author's last name
        last_a: String,

        /// Second author's fore name
        fore_b: String,

        /// Second author's last name
        last_b: String,
    },

    /// Citation ranking and most frequent journal for an author
    Author {
        /// Fore name
        fore_name: String,

        /// Last name
        last_name: String,
    },

    /// Migrate a journal's recent articles to a new journal id and name
    RenameJournal {
        /// Current journal id
        journal: String,

        /// First completion year to migrate (inclusive)
        year: i32,

        /// New journal name
        new_name: String,

        /// New journal id
        new_id: String,
    },

    /// List articles funded by a country's grants
    Funding {
        /// Funding country
        country: String,
    },

    /// Count articles per completion year for a keyword
    Keyword {
        /// Keyword (matched exactly)
        keyword: String,
    },

    /// Show store statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let db = cli.db.unwrap_or_else(|| PathBuf::from("hypatia.db"));

    // Run the appropriate command
    let result = match cli.command {
        Commands::Load { file } => cli::load::run(&db, &file),
        Commands::Citations { pmid, year, json } => cli::citations::run(&db, pmid, year, json),
        Commands::Impact { journal, year } => cli::impact::run(&db, &journal, year),
        Commands::Simulate { file } => cli::simulate::run(&db, &file),
        Commands::Link {
            fore_a,
            last_a,
            fore_b,
            last_b,
        } => cli::link::run(&db, &fore_a, &last_a, &fore_b, &last_b),
        Commands::Author {
            fore_name,
            last_name,
        } => cli::author::run(&db, &fore_name, &last_name),
        Commands::RenameJournal {
            journal,
            year,
            new_name,
            new_id,
        } => cli::journal::run(&db, &journal, year, &new_name, &new_id),
        Commands::Funding { country } => cli::funding::run(&db, &country),
        Commands::Keyword { keyword } => cli::keyword::run(&db, &keyword),
        Commands::Stats => cli::stats::run(&db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

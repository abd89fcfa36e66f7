//! `hypatia load` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

use crate::cli::display;

/// Run the load command.
pub fn run(db: &Path, file: &Path) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    println!(
        "Loading {} into {}",
        file.display().to_string().white().bold(),
        db.display()
    );

    let stats = engine.load_articles(file)?;

    println!();
    println!(
        "  {}: {} in {} batches ({:.1?})",
        "Loaded".white().bold(),
        stats.articles_loaded.to_string().green(),
        stats.batches_committed,
        stats.duration
    );

    if !stats.errors.is_empty() {
        println!(
            "  {}: {} records skipped",
            "Errors".yellow().bold(),
            stats.errors.len().to_string().yellow()
        );
        display::print_record_errors(&stats.errors);
        let internal = stats.errors.iter().filter(|e| e.is_internal_error()).count();
        if internal > 0 {
            println!(
                "    {}",
                "Some failures came from the store itself, not the input.".dimmed()
            );
        }
    }

    Ok(())
}

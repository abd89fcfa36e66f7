//! `hypatia rename-journal` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

/// Run the rename-journal command.
pub fn run(
    db: &Path,
    journal: &str,
    year: i32,
    new_name: &str,
    new_id: &str,
) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let migrated = engine.update_journal_name(journal, year, new_name, new_id)?;

    if migrated {
        let count = engine.store().journal_article_count(new_id)?;
        println!(
            "Migrated articles completed in {year} or later from {} to {}",
            journal.white().bold(),
            new_id.white().bold()
        );
        println!(
            "  {}: {} now carries {} article{}",
            "Done".green().bold(),
            new_name,
            count.to_string().green(),
            if count == 1 { "" } else { "s" }
        );
    } else {
        println!(
            "{}: nothing migrated from {}",
            "No change".yellow().bold(),
            journal.white().bold()
        );
        println!(
            "    {}",
            "Either the journal is unknown or no article completed in or after the given year."
                .dimmed()
        );
    }

    Ok(())
}

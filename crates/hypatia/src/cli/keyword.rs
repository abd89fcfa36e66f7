//! `hypatia keyword` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

/// Run the keyword command.
pub fn run(db: &Path, keyword: &str) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let counts = engine.keyword_counts_by_year(keyword)?;

    println!("{}", keyword.white().bold());
    if counts.is_empty() {
        println!("    {}", "No articles carry this keyword.".dimmed());
        return Ok(());
    }

    for (year, count) in counts {
        println!("    {}: {}", year.to_string().dimmed(), count);
    }

    Ok(())
}

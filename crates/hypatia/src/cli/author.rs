//! `hypatia author` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::{AuthorKey, Hypatia};

/// Run the author command.
pub fn run(db: &Path, fore_name: &str, last_name: &str) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;
    let author = AuthorKey::new(fore_name, last_name);

    let counts = engine.articles_by_author_sorted_by_citations(&author)?;
    let top_journal = engine.journal_with_most_articles_by_author(&author)?;

    println!("{}", author.to_string().white().bold());

    if counts.is_empty() {
        println!("    {}", "No articles recorded for this author.".dimmed());
        return Ok(());
    }

    println!(
        "  {}: {}",
        "Articles".white().bold(),
        counts.len().to_string().green()
    );

    let ranked: Vec<String> = counts.iter().map(ToString::to_string).collect();
    println!(
        "  {}: {}",
        "Citations per article (descending)".white().bold(),
        ranked.join(", ")
    );

    match top_journal {
        Some(title) => println!("  {}: {title}", "Most frequent journal".white().bold()),
        None => println!(
            "  {}: {}",
            "Most frequent journal".white().bold(),
            "none on record".dimmed()
        ),
    }

    Ok(())
}

//! `hypatia simulate` command implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use colored::Colorize;
use hypatia::{Article, Hypatia};

/// Run the simulate command.
pub fn run(db: &Path, file: &Path) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let reader = BufReader::new(File::open(file)?);
    let article: Article = serde_json::from_reader(reader)?;

    let journal = article
        .journal
        .as_ref()
        .map_or_else(|| "(no journal)".to_string(), |j| j.title.clone());
    let year = article.completed_year();

    let factor = engine.add_article_and_update_impact_factor(&article)?;

    println!(
        "Simulated adding {} ({year}) to {}",
        article.pmid.to_string().white().bold(),
        journal.white().bold()
    );
    println!(
        "  {}: {}",
        "Impact factor would be".white().bold(),
        format!("{factor:.3}").green()
    );
    println!("  {}", "The store was not modified.".dimmed());

    Ok(())
}

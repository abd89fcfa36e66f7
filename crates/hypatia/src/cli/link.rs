//! `hypatia link` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::{AuthorKey, Hypatia};

/// Run the link command.
pub fn run(
    db: &Path,
    fore_a: &str,
    last_a: &str,
    fore_b: &str,
    last_b: &str,
) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let author_a = AuthorKey::new(fore_a, last_a);
    let author_b = AuthorKey::new(fore_b, last_b);

    let hops = engine.min_articles_to_link_authors(&author_a, &author_b)?;

    println!(
        "{} -> {}",
        author_a.to_string().white().bold(),
        author_b.to_string().white().bold()
    );
    if hops < 0 {
        println!(
            "  {}",
            "No citation path connects these authors.".yellow()
        );
    } else if hops == 0 {
        println!(
            "  {}: they share an article",
            "Linked".white().bold()
        );
    } else {
        println!(
            "  {}: {} citation hop{}",
            "Linked".white().bold(),
            hops.to_string().green(),
            if hops == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

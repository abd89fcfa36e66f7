//! `hypatia impact` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

/// Run the impact command.
pub fn run(db: &Path, journal: &str, year: i32) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let title = engine
        .store()
        .get_journal(journal)?
        .map_or_else(|| journal.to_string(), |j| j.title);

    let factor = engine.impact_factor(journal, year)?;
    let window = format!("{}-{}", year - 2, year - 1);

    println!("{}", title.white().bold());
    println!(
        "  {}: {} for {year} (articles from {window})",
        "Impact factor".white().bold(),
        format!("{factor:.3}").green()
    );

    if factor.abs() < f64::EPSILON {
        println!(
            "    {}",
            "Zero can mean no citations or no articles in the window.".dimmed()
        );
    }

    Ok(())
}

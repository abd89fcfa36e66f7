//! `hypatia funding` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

use crate::cli::display;

/// Run the funding command.
pub fn run(db: &Path, country: &str) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    let pmids = engine.articles_funded_by_country(country)?;

    println!(
        "Articles funded from {}: {}",
        country.white().bold(),
        pmids.len().to_string().green()
    );
    display::print_pmids(&pmids, "No grants from this country on record.");

    Ok(())
}

//! Common display utilities for CLI commands.

use colored::Colorize;
use hypatia::{Pmid, RecordError};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Display a list of pmids with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` entries with bullet points. If there are
/// more, shows "... and N more". If empty, shows the provided
/// `empty_message`.
pub fn print_pmids(pmids: &[Pmid], empty_message: &str) {
    if pmids.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for pmid in pmids.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {pmid}", "•".dimmed());
    }

    if pmids.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            pmids.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Display per-record load errors in file order, truncated.
pub fn print_record_errors(errors: &[RecordError]) {
    for error in errors.iter().take(MAX_DISPLAY_ITEMS) {
        let label = error.kind.as_str().yellow();
        println!("    {} [{label}] {error}", "•".dimmed());
    }

    if errors.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            errors.len() - MAX_DISPLAY_ITEMS
        );
    }
}

//! `hypatia stats` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::Hypatia;

/// Run the stats command.
pub fn run(db: &Path) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;

    // Get database size
    let db_size_str = match std::fs::metadata(db) {
        Ok(meta) => format_size(meta.len()),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => {
                tracing::debug!("Database file not found");
                "not created".to_string()
            }
            std::io::ErrorKind::PermissionDenied => {
                tracing::warn!(path = %db.display(), "Permission denied reading database");
                "permission denied".to_string()
            }
            _ => {
                tracing::debug!(error = %e, "Failed to get database file size");
                "size unknown".to_string()
            }
        },
    };

    let stats = engine.stats()?;

    println!("{}", "Hypatia Store Statistics".cyan().bold());
    println!();

    println!(
        "  {}: {} ({})",
        "Database".white().bold(),
        db.display(),
        db_size_str
    );
    println!();

    println!(
        "  {}: {}",
        "Articles".white().bold(),
        stats.articles.to_string().green()
    );
    println!(
        "  {}: {}",
        "Journals".white().bold(),
        stats.journals.to_string().green()
    );
    println!(
        "  {}: {}",
        "Authors".white().bold(),
        stats.authors.to_string().green()
    );
    println!(
        "  {}: {}",
        "Citation edges".white().bold(),
        stats.citations.to_string().green()
    );
    println!(
        "  {}: {}",
        "Grants".white().bold(),
        stats.grants.to_string().green()
    );
    println!(
        "  {}: {}",
        "Keyword links".white().bold(),
        stats.keywords.to_string().green()
    );

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

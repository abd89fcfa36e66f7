//! `hypatia citations` command implementation.

use std::path::Path;

use colored::Colorize;
use hypatia::{Hypatia, Pmid};
use tracing::debug;

/// Run the citations command.
///
/// Looks up how often an article is cited, overall or within a single year,
/// and displays the count in either human-readable or JSON format.
pub fn run(db: &Path, pmid: i64, year: Option<i32>, json: bool) -> Result<(), hypatia::Error> {
    let engine = Hypatia::open(db)?;
    let pmid = Pmid(pmid);

    debug!(%pmid, year = ?year, "Querying citation counts");
    let title = engine.article(pmid)?.map(|article| article.title);
    let count = match year {
        Some(year) => engine.article_citations_by_year(pmid, year)?,
        None => engine.article_citations(pmid)?,
    };

    if json {
        output_json(pmid, title.as_deref(), year, count)?;
    } else {
        output_human(pmid, title.as_deref(), year, count);
    }

    Ok(())
}

/// Output the citation count in JSON format.
fn output_json(
    pmid: Pmid,
    title: Option<&str>,
    year: Option<i32>,
    count: i64,
) -> Result<(), hypatia::Error> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        pmid: i64,
        title: Option<&'a str>,
        year: Option<i32>,
        citations: i64,
    }

    let output = JsonOutput {
        pmid: pmid.as_i64(),
        title,
        year,
        citations: count,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Output the citation count in human-readable format.
fn output_human(pmid: Pmid, title: Option<&str>, year: Option<i32>, count: i64) {
    match title {
        Some(title) => {
            println!("{} {title}", pmid.to_string().white().bold());
        }
        None => {
            // Cited works need not be stored themselves; their counts are
            // still tracked.
            println!(
                "{} {}",
                pmid.to_string().white().bold(),
                "(not in store; counts cover citations pointing at it)".dimmed()
            );
        }
    }

    match year {
        Some(year) => println!(
            "  {}: {} in {year}",
            "Citations".white().bold(),
            count.to_string().green()
        ),
        None => println!(
            "  {}: {} across all years",
            "Citations".white().bold(),
            count.to_string().green()
        ),
    }
}

//! Impact factor calculation.
//!
//! The impact factor of journal J for year Y is
//!
//! ```text
//!     citations received in Y by J's articles completed in {Y-2, Y-1}
//!     -----------------------------------------------------------------
//!     number of J's articles completed in {Y-2, Y-1}
//! ```
//!
//! with an explicit 0 when the denominator is empty. The numerator comes
//! from the citation-count cache, keyed by the citing article's completion
//! year, so the calculation never re-aggregates the citation graph.

use rusqlite::Connection;

use crate::cache::{get_in_year_in, CitationCache};
use crate::error::Result;
use crate::store::journals::journal_articles_completed_between_in;
use crate::store::Store;
use crate::types::Pmid;

/// Impact factor of a journal for a target year.
///
/// An unknown journal, or one without articles in the two preceding years,
/// yields 0 rather than an error: an empty denominator is an answer, not a
/// failure.
pub(crate) fn impact_factor(
    store: &Store,
    cache: &CitationCache,
    journal_id: &str,
    year: i32,
) -> Result<f64> {
    let articles = store.journal_articles_completed_between(journal_id, year - 2, year - 1)?;
    if articles.is_empty() {
        return Ok(0.0);
    }
    let citations: i64 = articles
        .iter()
        .map(|&pmid| cache.get_in_year(Pmid(pmid), year))
        .sum();
    Ok(ratio(citations, articles.len()))
}

/// Impact factor on an open connection, for use inside a transaction that
/// has already applied pending article and cache writes.
pub(crate) fn impact_factor_in(conn: &Connection, journal_id: &str, year: i32) -> Result<f64> {
    let articles = journal_articles_completed_between_in(conn, journal_id, year - 2, year - 1)?;
    if articles.is_empty() {
        return Ok(0.0);
    }
    let mut citations = 0i64;
    for &pmid in &articles {
        citations += get_in_year_in(conn, Pmid(pmid), year)?;
    }
    Ok(ratio(citations, articles.len()))
}

#[allow(clippy::cast_precision_loss)]
fn ratio(citations: i64, articles: usize) -> f64 {
    citations as f64 / articles as f64
}
